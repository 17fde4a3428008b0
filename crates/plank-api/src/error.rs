//! HTTP mapping for the core's access outcomes and for infrastructure
//! failures. NotFound and Forbidden carry the core's fixed messages
//! through unchanged; internal errors are logged and kept generic.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use plank_core::access::ResolvedContext;
use plank_core::outcome::Access;
use plank_types::api::MessageResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            ApiError::Internal(e) => {
                error!("internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

/// Unwrap an [`Access`] outcome, converting NotFound/Forbidden into the
/// matching response. Callers get the resolved chain back on Allow.
pub fn require(access: Access) -> Result<ResolvedContext, ApiError> {
    match access {
        Access::Allow(ctx) => Ok(ctx),
        Access::NotFound(kind) => Err(ApiError::NotFound(kind.not_found_message())),
        Access::Forbidden(rejection) => Err(ApiError::Forbidden(rejection.message().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plank_core::outcome::{Rejection, ResourceKind};

    #[test]
    fn outcomes_keep_their_distinct_messages() {
        let err = require(Access::NotFound(ResourceKind::List)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "list not found"));

        let err = require(Access::Forbidden(Rejection::NotAnAdmin)).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Forbidden(ref m) if m == "you are not an administrator of this board"
        ));
    }
}
