// Application-level endpoints that are not part of the planner itself.

use salvo::writing::Text;
use salvo::{Response, Router, handler};

use planner_core::constants::APP_ROUTE_COMPONENT;

mod info;

/// ## Summary
/// Liveness check. Answers without touching the planner state.
#[handler]
async fn healthcheck_handler(res: &mut Response) {
    res.render(Text::Plain("OK"));
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(APP_ROUTE_COMPONENT)
        .push(Router::with_path("healthcheck").get(healthcheck_handler))
        .push(info::routes())
}
