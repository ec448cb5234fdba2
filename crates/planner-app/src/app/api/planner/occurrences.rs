use chrono::NaiveDate;
use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;
use uuid::Uuid;

use planner_core::calendar::parse_month;
use planner_core::constants::USERS_ROUTE_COMPONENT;
use planner_core::error::CoreError;
use planner_service::planner::{AgendaDay, OccurrenceView};

use crate::app::api::response::{path_uuid, render_result};
use crate::error::AppResult;
use crate::planner_handler::get_planner_from_depot;

/// ## Summary
/// Month occurrences response payload
#[derive(Debug, Serialize)]
pub struct OccurrencesResponse {
    pub owner_id: Uuid,
    pub month: String,
    pub today: NaiveDate,
    pub occurrences: Vec<OccurrenceView>,
}

/// ## Summary
/// Month agenda response payload
#[derive(Debug, Serialize)]
pub struct AgendaResponse {
    pub owner_id: Uuid,
    pub month: String,
    pub today: NaiveDate,
    pub days: Vec<AgendaDay>,
}

/// Owner path parameter and `month` query parameter shared by both views.
fn month_request(req: &Request) -> AppResult<(Uuid, NaiveDate)> {
    let owner_id = path_uuid(req, "owner_id")?;
    let Some(month) = req.query::<String>("month") else {
        return Err(CoreError::InvalidInput("month query parameter required".to_string()).into());
    };
    Ok((owner_id, parse_month(&month)?))
}

async fn occurrences(req: &mut Request, depot: &Depot) -> AppResult<OccurrencesResponse> {
    let planner = get_planner_from_depot(depot)?;
    let (owner_id, reference) = month_request(req)?;

    let month = planner.month_occurrences(owner_id, reference).await?;

    Ok(OccurrencesResponse {
        owner_id,
        month: reference.format("%Y-%m").to_string(),
        today: month.today,
        occurrences: month.occurrences,
    })
}

/// ## Summary
/// GET /planner/users/{owner_id}/occurrences?month=YYYY-MM
///
/// Every occurrence of the owner's events in the month, sorted by day.
///
/// ## Errors
/// Returns HTTP 400 if `month` is missing or malformed
#[handler]
async fn occurrences_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, occurrences(req, depot).await);
}

async fn agenda(req: &mut Request, depot: &Depot) -> AppResult<AgendaResponse> {
    let planner = get_planner_from_depot(depot)?;
    let (owner_id, reference) = month_request(req)?;

    let agenda = planner.month_agenda(owner_id, reference).await?;

    Ok(AgendaResponse {
        owner_id,
        month: reference.format("%Y-%m").to_string(),
        today: agenda.today,
        days: agenda.days,
    })
}

/// ## Summary
/// GET /planner/users/{owner_id}/agenda?month=YYYY-MM
///
/// The same occurrences grouped per day, for calendar rendering.
#[handler]
async fn agenda_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, agenda(req, depot).await);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(USERS_ROUTE_COMPONENT).push(
        Router::with_path("{owner_id}")
            .push(Router::with_path("occurrences").get(occurrences_handler))
            .push(Router::with_path("agenda").get(agenda_handler)),
    )
}
