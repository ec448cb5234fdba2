use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Deserialize;

use planner_service::planner::{Comment, NewComment};

use crate::app::api::response::{json_body, path_uuid, render_empty, render_result};
use crate::error::AppResult;
use crate::planner_handler::get_planner_from_depot;

/// ## Summary
/// Edit comment request payload
#[derive(Debug, Deserialize)]
pub struct EditCommentRequest {
    pub text: String,
}

async fn add_comment(req: &mut Request, depot: &Depot) -> AppResult<Comment> {
    let planner = get_planner_from_depot(depot)?;
    let event_id = path_uuid(req, "id")?;
    let new_comment: NewComment = json_body(req).await?;
    Ok(planner.add_comment(event_id, new_comment).await?)
}

/// ## Summary
/// POST /planner/events/{id}/comments - Append a comment, optionally pinned to one day
///
/// ## Errors
/// Returns HTTP 400 for empty text or a pinned day the event does not occur on
/// Returns HTTP 404 if the event does not exist
#[handler]
async fn add_comment_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::CREATED, add_comment(req, depot).await);
}

async fn edit_comment(req: &mut Request, depot: &Depot) -> AppResult<Comment> {
    let planner = get_planner_from_depot(depot)?;
    let event_id = path_uuid(req, "id")?;
    let comment_id = path_uuid(req, "comment_id")?;
    let body: EditCommentRequest = json_body(req).await?;
    Ok(planner.edit_comment(event_id, comment_id, &body.text).await?)
}

/// ## Summary
/// PATCH /planner/events/{id}/comments/{comment_id}
#[handler]
async fn edit_comment_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_result(res, StatusCode::OK, edit_comment(req, depot).await);
}

async fn delete_comment(req: &mut Request, depot: &Depot) -> AppResult<()> {
    let planner = get_planner_from_depot(depot)?;
    let event_id = path_uuid(req, "id")?;
    let comment_id = path_uuid(req, "comment_id")?;
    Ok(planner.delete_comment(event_id, comment_id).await?)
}

/// ## Summary
/// DELETE /planner/events/{id}/comments/{comment_id}
#[handler]
async fn delete_comment_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    render_empty(res, delete_comment(req, depot).await);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("comments")
        .post(add_comment_handler)
        .push(
            Router::with_path("{comment_id}")
                .patch(edit_comment_handler)
                .delete(delete_comment_handler),
        )
}
