use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::domain::{TransactionStatus, transition::Ineligible};
use crate::ports::{ChannelError, StoreError};
use crate::validation::ValidationError;

/// Every failure path of the service as a typed outcome. No internal
/// retries anywhere: callers decide, and redelivered requests stay
/// correct through deterministic derived ids, not suppression here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Transaction {id} cannot be reversed, status is {status}")]
    Ineligible {
        id: String,
        status: TransactionStatus,
    },

    #[error("Transaction {0} was modified concurrently, reversal aborted")]
    Conflict(String),

    #[error("Downstream error: {0}")]
    Downstream(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Ineligible { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Downstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to callers. Internal detail is logged,
    /// never leaked.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.message)
    }
}

impl From<Ineligible> for AppError {
    fn from(err: Ineligible) -> Self {
        AppError::Ineligible {
            id: err.id,
            status: err.status,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { id, .. } => AppError::Conflict(id),
            StoreError::Backend(detail) => AppError::Downstream(detail),
        }
    }
}

impl From<ChannelError> for AppError {
    fn from(err: ChannelError) -> Self {
        AppError::Downstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.public_message() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let error = AppError::Validation("Missing required fields: reason".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn ineligible_is_bad_request_and_names_the_status() {
        let error = AppError::Ineligible {
            id: "T3".to_string(),
            status: TransactionStatus::Voided,
        };

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.public_message(),
            "Transaction T3 cannot be reversed, status is Voided"
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        let error = AppError::NotFound("Transaction T4 not found".to_string());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.public_message(), "Transaction T4 not found");
    }

    #[test]
    fn lost_conditional_update_maps_to_conflict() {
        let error: AppError = StoreError::Conflict {
            id: "T5".to_string(),
            expected: TransactionStatus::Completed,
        }
        .into();

        assert!(matches!(error, AppError::Conflict(ref id) if id == "T5"));
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn downstream_and_internal_map_to_500() {
        let downstream = AppError::Downstream("store backend error: timeout".to_string());
        assert_eq!(downstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let internal = AppError::Internal("panic detail".to_string());
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.public_message(), "Internal server error");
    }

    #[tokio::test]
    async fn error_responses_carry_the_status() {
        let response = AppError::NotFound("Transaction T4 not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Validation("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
