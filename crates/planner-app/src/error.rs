use salvo::http::StatusCode;
use thiserror::Error;

use planner_core::error::CoreError;
use planner_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] CoreError),
}

impl AppError {
    /// ## Summary
    /// HTTP status an error is reported with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::ServiceError(
                ServiceError::ValidationError(_)
                | ServiceError::CoreError(CoreError::InvalidInput(_) | CoreError::ParseError(_)),
            )
            | Self::CoreError(CoreError::InvalidInput(_) | CoreError::ParseError(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::ServiceError(ServiceError::Conflict(_)) => StatusCode::CONFLICT,
            Self::ServiceError(_) | Self::CoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// ## Summary
    /// Message safe to show to a client. Internal failures are not echoed.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
