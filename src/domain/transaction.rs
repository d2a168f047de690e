//! Transaction domain entity.
//! Framework-agnostic representation of a ledger transaction and its
//! read-path void projection.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a transaction.
///
/// `Settled` is only ever observed on ledger entries written by the
/// settlement pipeline; the reversal write path never produces it and
/// always rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    PaymentSuccess,
    Settled,
    Voided,
    Refunded,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Processing => "Processing",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::PaymentSuccess => "PaymentSuccess",
            TransactionStatus::Settled => "Settled",
            TransactionStatus::Voided => "Voided",
            TransactionStatus::Refunded => "Refunded",
        }
    }

    /// Terminal statuses can never be reversed again, on either the
    /// write path or the void-preview read path.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Voided | TransactionStatus::Refunded | TransactionStatus::Settled
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(TransactionStatus::Pending),
            "Processing" => Ok(TransactionStatus::Processing),
            "Completed" => Ok(TransactionStatus::Completed),
            "PaymentSuccess" => Ok(TransactionStatus::PaymentSuccess),
            "Settled" => Ok(TransactionStatus::Settled),
            "Voided" => Ok(TransactionStatus::Voided),
            "Refunded" => Ok(TransactionStatus::Refunded),
            other => Err(format!("unknown transaction status: {other}")),
        }
    }
}

/// Domain entity representing a ledger transaction.
///
/// Derived (void/refund) records use the same shape: `amount` carries
/// the negated magnitude, `linked_transaction_id` points back at the
/// original, and `reason` records why the reversal happened.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: String,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    pub linked_transaction_id: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(id: impl Into<String>, amount: BigDecimal, status: TransactionStatus) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            amount,
            status,
            linked_transaction_id: None,
            reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Read-path projection of a ledger entry into its void counterpart.
/// Never persisted; callers use it to preview or drive a subsequent
/// write-path reversal.
#[derive(Debug, Clone, Serialize)]
pub struct VoidEntry {
    pub transaction_id: String,
    pub original_entry_id: String,
    pub entry_type: String,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

impl VoidEntry {
    pub fn from_entry(entry: &Transaction, transaction_id: &str) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            original_entry_id: entry.id.clone(),
            entry_type: "Void".to_string(),
            amount: -&entry.amount,
            status: TransactionStatus::Voided,
            timestamp: entry.updated_at,
        }
    }
}
