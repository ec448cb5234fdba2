use salvo::Router;

use planner_core::constants::PLANNER_ROUTE_COMPONENT;

mod comments;
mod events;
mod occurrences;

#[must_use]
pub fn routes() -> Router {
    Router::with_path(PLANNER_ROUTE_COMPONENT)
        .push(events::routes())
        .push(occurrences::routes())
}
