/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";
pub const APP_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", APP_ROUTE_COMPONENT);

pub const PLANNER_ROUTE_COMPONENT: &str = "planner";
pub const PLANNER_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", PLANNER_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(PLANNER_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

pub const USERS_ROUTE_COMPONENT: &str = "users";
pub const USERS_ROUTE_PREFIX: &str =
    const_str::concat!(PLANNER_ROUTE_PREFIX, "/", USERS_ROUTE_COMPONENT);
