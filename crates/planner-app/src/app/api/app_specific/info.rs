use chrono::NaiveDate;
use salvo::http::StatusCode;
use salvo::{Depot, Response, Router, handler};
use serde::Serialize;

use crate::app::api::response::render_result;
use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::planner_handler::get_planner_from_depot;

/// ## Summary
/// Server information payload
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub origin: String,
    pub timezone: String,
    pub today: NaiveDate,
}

fn info(depot: &Depot) -> AppResult<InfoResponse> {
    let settings = get_config_from_depot(depot)?;
    let planner = get_planner_from_depot(depot)?;

    Ok(InfoResponse {
        origin: settings.server.origin(),
        timezone: planner.timezone().name().to_string(),
        today: planner.today(),
    })
}

/// ## Summary
/// Returns the public origin, the planner timezone and the day the planner
/// currently considers "today".
#[handler]
async fn info_handler(depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, info(depot));
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("info").get(info_handler)
}
