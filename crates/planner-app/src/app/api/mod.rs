mod app_specific;
mod planner;
pub mod response;

use salvo::Router;

// Re-export route constants from core
pub use planner_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, APP_ROUTE_COMPONENT, APP_ROUTE_PREFIX,
    EVENTS_ROUTE_COMPONENT, EVENTS_ROUTE_PREFIX, PLANNER_ROUTE_COMPONENT, PLANNER_ROUTE_PREFIX,
    USERS_ROUTE_COMPONENT, USERS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(planner::routes())
}
