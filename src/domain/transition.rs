//! Reversal state machine.
//!
//! Pure decision logic: given a transaction and the requested amounts,
//! choose void or refund and produce the plan the write path executes.
//! Both the write path and the void-preview read path take their
//! eligibility rules from here so the two can never diverge.

use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Transaction, TransactionStatus};

/// The two ways a transaction can be reversed.
///
/// Finalized payments (`PaymentSuccess`) are reversed only via refund;
/// non-finalized transactions (`Completed`, `Processing`) are voided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReversalKind {
    Void,
    Refund,
}

impl ReversalKind {
    /// The reversal kind a source status admits, if any. Every other
    /// status, terminal or not, is ineligible.
    pub fn for_status(status: TransactionStatus) -> Option<Self> {
        match status {
            TransactionStatus::PaymentSuccess => Some(ReversalKind::Refund),
            TransactionStatus::Completed | TransactionStatus::Processing => {
                Some(ReversalKind::Void)
            }
            _ => None,
        }
    }

    pub fn derived_status(self) -> TransactionStatus {
        match self {
            ReversalKind::Void => TransactionStatus::Voided,
            ReversalKind::Refund => TransactionStatus::Refunded,
        }
    }

    fn id_suffix(self) -> &'static str {
        match self {
            ReversalKind::Void => "VOID",
            ReversalKind::Refund => "REFUND",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReversalKind::Void => "Void",
            ReversalKind::Refund => "Refund",
        }
    }
}

/// A transaction whose current status does not admit a reversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transaction {id} cannot be reversed, status is {status}")]
pub struct Ineligible {
    pub id: String,
    pub status: TransactionStatus,
}

/// Everything the write path needs to execute one reversal: the
/// derived record to create and the status to conditionally write
/// onto the original.
#[derive(Debug, Clone)]
pub struct ReversalPlan {
    pub kind: ReversalKind,
    pub derived_id: String,
    pub derived_amount: BigDecimal,
    pub derived_status: TransactionStatus,
    pub target_status: TransactionStatus,
}

impl ReversalPlan {
    /// Materialize the derived ledger record for this plan, linked
    /// back to the original.
    pub fn derived_transaction(&self, original: &Transaction, reason: &str) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: self.derived_id.clone(),
            amount: self.derived_amount.clone(),
            status: self.derived_status,
            linked_transaction_id: Some(original.id.clone()),
            reason: Some(reason.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Decide how to reverse `transaction`.
///
/// The derived id is a deterministic function of the original id and
/// the kind, so a redelivered request re-derives the same record
/// instead of creating a second one. When the caller supplies no
/// explicit amount the full outstanding amount on the transaction is
/// reversed.
pub fn decide(
    transaction: &Transaction,
    refund_amount: Option<&BigDecimal>,
    void_amount: Option<&BigDecimal>,
) -> Result<ReversalPlan, Ineligible> {
    let kind = ReversalKind::for_status(transaction.status).ok_or_else(|| Ineligible {
        id: transaction.id.clone(),
        status: transaction.status,
    })?;

    let requested = match kind {
        ReversalKind::Refund => refund_amount,
        ReversalKind::Void => void_amount,
    }
    .unwrap_or(&transaction.amount);

    let derived_status = kind.derived_status();
    Ok(ReversalPlan {
        kind,
        derived_id: format!("{}-{}", transaction.id, kind.id_suffix()),
        derived_amount: -requested.abs(),
        derived_status,
        target_status: derived_status,
    })
}
