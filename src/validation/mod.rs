//! Request shape validation for the reversal write path.
//!
//! Only the shape is checked here; status eligibility lives in
//! `domain::transition` so the write and read paths share one rule
//! set.

use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::fmt;

/// Reversal request as submitted by callers. Field names are part of
/// the wire contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReversalRequest {
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub reason: String,
    pub refund_amount: Option<BigDecimal>,
    pub void_amount: Option<BigDecimal>,
}

/// A request that passed shape validation.
#[derive(Debug, Clone)]
pub struct ValidatedReversal {
    pub transaction_id: String,
    pub actor: String,
    pub reason: String,
    pub refund_amount: Option<BigDecimal>,
    pub void_amount: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_reversal(request: &ReversalRequest) -> Result<ValidatedReversal, ValidationError> {
    let transaction_id = sanitize_string(&request.transaction_id);
    let actor = sanitize_string(&request.user_id);
    let reason = sanitize_string(&request.reason);

    let missing: Vec<&str> = [
        ("transactionId", transaction_id.is_empty()),
        ("userId", actor.is_empty()),
        ("reason", reason.is_empty()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(field, _)| *field)
    .collect();

    if !missing.is_empty() {
        return Err(ValidationError::new(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    validate_positive_amount("refundAmount", request.refund_amount.as_ref())?;
    validate_positive_amount("voidAmount", request.void_amount.as_ref())?;

    Ok(ValidatedReversal {
        transaction_id,
        actor,
        reason,
        refund_amount: request.refund_amount.clone(),
        void_amount: request.void_amount.clone(),
    })
}

fn validate_positive_amount(
    field: &'static str,
    amount: Option<&BigDecimal>,
) -> Result<(), ValidationError> {
    if let Some(amount) = amount {
        if amount <= &BigDecimal::from(0) {
            return Err(ValidationError::new(format!(
                "{field} must be greater than zero"
            )));
        }
    }

    Ok(())
}
