//! Reversal notification payload.
//!
//! Messages for one original transaction share a group key so the
//! channel delivers them in submission order; the dedup key is the
//! derived transaction id, which makes a retried publish of the same
//! reversal a duplicate the channel suppresses.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ReversalKind, Transaction};

/// Wire payload describing one completed reversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReversalEvent {
    pub transaction_id: String,
    pub original_transaction_id: String,
    pub amount: BigDecimal,
    pub reason: String,
    pub kind: ReversalKind,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub group_key: String,
    pub dedup_key: String,
    pub event: ReversalEvent,
}

impl NotificationMessage {
    pub fn for_reversal(
        original: &Transaction,
        derived: &Transaction,
        kind: ReversalKind,
        reason: &str,
    ) -> Self {
        Self {
            group_key: format!("reversal-{}", original.id),
            dedup_key: derived.id.clone(),
            event: ReversalEvent {
                transaction_id: derived.id.clone(),
                original_transaction_id: original.id.clone(),
                amount: derived.amount.clone(),
                reason: reason.to_string(),
                kind,
                occurred_at: Utc::now(),
            },
        }
    }
}
