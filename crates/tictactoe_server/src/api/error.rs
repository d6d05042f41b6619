//! Mapping from service errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::GameError;
use crate::api::types::ErrorResponse;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// An unexpected server-side failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal",
            message: message.into(),
        }
    }

    /// A body or path the server could not decode.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(%message, "Malformed request");
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_request",
            message,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        let status = match &err {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::GameOver(_) => StatusCode::CONFLICT,
            _ if !err.is_client_error() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            error!(error = %err, "Request failed");
            // Storage details stay in the log.
            return Self::internal("Internal server error");
        }

        warn!(error = %err, code = err.code(), "Request rejected");
        Self {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssignmentError;
    use crate::db::{DbError, DbErrorKind};
    use tictactoe_core::{Outcome, TransitionError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(GameError::NotFound(1)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(GameError::GameOver(Outcome::Draw)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(GameError::Transition(TransitionError::CellOverwrite { index: 0 }))
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(GameError::Assignment(AssignmentError::TooManyPlayers {
                requested: 3
            }))
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_db_details_hidden() {
        let err = ApiError::from(GameError::Db(DbError::new(
            DbErrorKind::Query,
            "secret path /var/db",
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "internal");
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_invalid_request_is_bad_request() {
        let err = ApiError::invalid_request("missing field `state`");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "invalid_request");
    }
}
