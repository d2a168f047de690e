use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::domain::ReversalKind;
use crate::error::AppError;
use crate::services::ReversalOutcome;
use crate::validation::{ReversalRequest, sanitize_string};

/// POST /reversals
pub async fn reverse_transaction(
    State(state): State<AppState>,
    Json(request): Json<ReversalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ReversalOutcome {
        kind,
        original_transaction_id,
        derived_transaction_id,
        ..
    } = state.reversals.execute(request).await?;

    let body = match kind {
        ReversalKind::Void => json!({
            "message": format!("Void processed successfully for transaction {original_transaction_id}"),
            "voidTransactionID": derived_transaction_id,
            "originalTransactionID": original_transaction_id,
        }),
        ReversalKind::Refund => json!({
            "message": format!("Refund processed successfully for transaction {original_transaction_id}"),
            "refundTransactionID": derived_transaction_id,
            "originalTransactionID": original_transaction_id,
        }),
    };

    Ok((StatusCode::OK, Json(body)))
}

#[derive(Debug, Deserialize)]
pub struct PrepareVoidRequest {
    #[serde(default)]
    pub transaction_id: String,
}

/// POST /void-entries
///
/// The read path keeps the success/error envelope its callers already
/// consume, so errors are shaped here instead of through
/// `AppError::into_response`.
pub async fn prepare_void_entries(
    State(state): State<AppState>,
    Json(request): Json<PrepareVoidRequest>,
) -> Response {
    let transaction_id = sanitize_string(&request.transaction_id);
    if transaction_id.is_empty() {
        let err = AppError::Validation("Transaction ID is required.".to_string());
        return (
            err.status_code(),
            Json(json!({ "success": false, "error": err.public_message() })),
        )
            .into_response();
    }

    match state.void_preview.prepare(&transaction_id).await {
        Ok(void_entries) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "void_entries": void_entries } })),
        )
            .into_response(),
        Err(err) => (
            err.status_code(),
            Json(json!({ "success": false, "error": err.public_message() })),
        )
            .into_response(),
    }
}
