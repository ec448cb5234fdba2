use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Deserialize;
use uuid::Uuid;

use planner_core::constants::EVENTS_ROUTE_COMPONENT;
use planner_core::error::CoreError;
use planner_service::planner::{Event, EventPatch, NewEvent};

use super::comments;
use crate::app::api::response::{json_body, path_uuid, render_empty, render_result};
use crate::error::AppResult;
use crate::planner_handler::get_planner_from_depot;

/// ## Summary
/// Reschedule request payload
#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub anchor_date: String,
}

async fn list_events(req: &mut Request, depot: &Depot) -> AppResult<Vec<Event>> {
    let planner = get_planner_from_depot(depot)?;

    let owner_id = match req.query::<String>("owner") {
        Some(raw) => Some(
            Uuid::parse_str(&raw)
                .map_err(|e| CoreError::InvalidInput(format!("invalid owner '{raw}': {e}")))?,
        ),
        None => None,
    };

    Ok(planner.list_events(owner_id).await?)
}

/// ## Summary
/// GET /planner/events[?owner=<uuid>] - List base events, optionally for one owner
#[handler]
async fn list_events_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, list_events(req, depot).await);
}

async fn create_event(req: &mut Request, depot: &Depot) -> AppResult<Event> {
    let planner = get_planner_from_depot(depot)?;
    let new_event: NewEvent = json_body(req).await?;
    Ok(planner.create_event(new_event).await?)
}

/// ## Summary
/// POST /planner/events - Create a base event
///
/// ## Errors
/// Returns HTTP 400 if the body is malformed, the title is empty, the
/// recurrence is unknown or the anchor date does not parse
#[handler]
async fn create_event_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing create event request");
    render_result(res, StatusCode::CREATED, create_event(req, depot).await);
}

async fn get_event(req: &mut Request, depot: &Depot) -> AppResult<Event> {
    let planner = get_planner_from_depot(depot)?;
    let id = path_uuid(req, "id")?;
    Ok(planner.get_event(id).await?)
}

/// ## Summary
/// GET /planner/events/{id}
///
/// ## Errors
/// Returns HTTP 404 if the event does not exist
#[handler]
async fn get_event_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, get_event(req, depot).await);
}

async fn update_event(req: &mut Request, depot: &Depot) -> AppResult<Event> {
    let planner = get_planner_from_depot(depot)?;
    let id = path_uuid(req, "id")?;
    let patch: EventPatch = json_body(req).await?;
    Ok(planner.update_event(id, patch).await?)
}

/// ## Summary
/// PATCH /planner/events/{id} - Edit title, description, recurrence or owner
///
/// The anchor date is not accepted here; use the reschedule endpoint.
///
/// ## Errors
/// Returns HTTP 400 for an invalid or empty patch (including one carrying `anchor_date`)
/// Returns HTTP 404 if the event does not exist
#[handler]
async fn update_event_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, update_event(req, depot).await);
}

async fn reschedule_event(req: &mut Request, depot: &Depot) -> AppResult<Event> {
    let planner = get_planner_from_depot(depot)?;
    let id = path_uuid(req, "id")?;
    let body: RescheduleRequest = json_body(req).await?;
    Ok(planner.reschedule_event(id, &body.anchor_date).await?)
}

/// ## Summary
/// POST /planner/events/{id}/reschedule - Replace the event with one on a new anchor
///
/// Responds with the replacement event, which has a new id.
#[handler]
async fn reschedule_event_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::CREATED, reschedule_event(req, depot).await);
}

async fn delete_event(req: &mut Request, depot: &Depot) -> AppResult<()> {
    let planner = get_planner_from_depot(depot)?;
    let id = path_uuid(req, "id")?;
    Ok(planner.delete_event(id).await?)
}

/// ## Summary
/// DELETE /planner/events/{id}
#[handler]
async fn delete_event_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_empty(res, delete_event(req, depot).await);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .get(list_events_handler)
        .post(create_event_handler)
        .push(
            Router::with_path("{id}")
                .get(get_event_handler)
                .patch(update_event_handler)
                .delete(delete_event_handler)
                .push(Router::with_path("reschedule").post(reschedule_event_handler))
                .push(comments::routes()),
        )
}
