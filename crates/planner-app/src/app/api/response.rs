//! Shared response rendering for API handlers.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Request, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use planner_core::error::CoreError;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn render_error(res: &mut Response, status: StatusCode, message: impl Into<String>) {
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: message.into(),
    }));
}

/// ## Summary
/// Renders an `AppError` with its mapped status. Server-side failures are
/// logged at error level, client mistakes at debug.
pub fn render_app_error(res: &mut Response, err: &AppError) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = ?err, "Request failed");
    } else {
        tracing::debug!(error = %err, %status, "Request rejected");
    }
    render_error(res, status, err.client_message());
}

/// ## Summary
/// Renders `result` as JSON with `status` on success, or as an error body.
pub fn render_result<T: Serialize + Send>(
    res: &mut Response,
    status: StatusCode,
    result: AppResult<T>,
) {
    match result {
        Ok(body) => {
            res.status_code(status);
            res.render(Json(body));
        }
        Err(e) => render_app_error(res, &e),
    }
}

/// ## Summary
/// Renders an empty `204 No Content` on success, or an error body.
pub fn render_empty(res: &mut Response, result: AppResult<()>) {
    match result {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => render_app_error(res, &e),
    }
}

/// ## Summary
/// Extracts a UUID path parameter.
///
/// ## Errors
/// Returns `CoreError::InvalidInput` if the parameter is missing or not a UUID.
pub fn path_uuid(req: &Request, name: &str) -> AppResult<Uuid> {
    let Some(raw) = req.param::<String>(name) else {
        return Err(CoreError::InvalidInput(format!("{name} required")).into());
    };

    Uuid::parse_str(&raw)
        .map_err(|e| CoreError::InvalidInput(format!("invalid {name} '{raw}': {e}")).into())
}

/// ## Summary
/// Parses a JSON request body.
///
/// ## Errors
/// Returns `CoreError::ParseError` if the body is missing or does not match `T`.
pub async fn json_body<T>(req: &mut Request) -> AppResult<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    req.parse_json::<T>()
        .await
        .map_err(|e| AppError::CoreError(CoreError::ParseError(format!("invalid request body: {e}"))))
}
