//! Reversal write path.
//!
//! Orchestrates one reversal request as a single synchronous unit of
//! work: validate, load, decide, persist the derived record,
//! conditionally update the original, record the audit entry, publish
//! the notification. No locks are held across the steps; concurrent
//! callers racing on the same transaction are serialized solely by
//! the conditional update, and the loser aborts before any audit or
//! notification write.

use std::sync::Arc;
use tracing::{error, info};

use crate::domain::{NotificationMessage, ReversalKind, transition};
use crate::error::AppError;
use crate::ports::{LedgerStore, NotificationChannel};
use crate::services::audit_recorder::AuditRecorder;
use crate::validation::{ReversalRequest, validate_reversal};

/// Outcome of a successful reversal.
#[derive(Debug)]
pub struct ReversalOutcome {
    pub kind: ReversalKind,
    pub original_transaction_id: String,
    pub derived_transaction_id: String,
    pub audit_id: String,
}

pub struct ReversalService {
    ledger: Arc<dyn LedgerStore>,
    recorder: AuditRecorder,
    channel: Arc<dyn NotificationChannel>,
}

impl ReversalService {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        recorder: AuditRecorder,
        channel: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self {
            ledger,
            recorder,
            channel,
        }
    }

    pub async fn execute(&self, request: ReversalRequest) -> Result<ReversalOutcome, AppError> {
        let validated = validate_reversal(&request)?;

        let original = self
            .ledger
            .get(&validated.transaction_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Transaction {} not found",
                    validated.transaction_id
                ))
            })?;

        let plan = transition::decide(
            &original,
            validated.refund_amount.as_ref(),
            validated.void_amount.as_ref(),
        )?;

        info!(
            transaction_id = %original.id,
            kind = plan.kind.label(),
            derived_id = %plan.derived_id,
            "reversal decided"
        );

        let derived = plan.derived_transaction(&original, &validated.reason);
        self.ledger.put(&derived).await?;

        // Compare-and-set against the status captured at decision
        // time. If another caller reversed the transaction in the
        // meantime this aborts with no audit entry or notification.
        self.ledger
            .conditional_update(&original.id, original.status, plan.target_status, &derived.id)
            .await?;

        let audit = self
            .recorder
            .record(&original, &derived, &validated.actor, &validated.reason)
            .await?;

        // The reversal is committed once the audit entry exists.
        // Notification is best-effort; a failed publish is reported
        // but never rolls back the ledger or audit writes.
        let message =
            NotificationMessage::for_reversal(&original, &derived, plan.kind, &validated.reason);
        if let Err(err) = self.channel.publish(&message).await {
            error!(
                transaction_id = %original.id,
                derived_id = %derived.id,
                error = %err,
                "reversal notification publish failed"
            );
        }

        info!(
            transaction_id = %original.id,
            derived_id = %derived.id,
            kind = plan.kind.label(),
            "reversal completed"
        );

        Ok(ReversalOutcome {
            kind: plan.kind,
            original_transaction_id: original.id,
            derived_transaction_id: derived.id,
            audit_id: audit.audit_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryAuditStore, MemoryChannel, MemoryLedgerStore};
    use crate::domain::{Transaction, TransactionStatus};
    use bigdecimal::BigDecimal;

    struct Fixture {
        ledger: Arc<MemoryLedgerStore>,
        audit: Arc<MemoryAuditStore>,
        channel: Arc<MemoryChannel>,
        service: ReversalService,
    }

    fn fixture() -> Fixture {
        let ledger = Arc::new(MemoryLedgerStore::default());
        let audit = Arc::new(MemoryAuditStore::default());
        let channel = Arc::new(MemoryChannel::default());
        let service = ReversalService::new(
            ledger.clone(),
            AuditRecorder::new(audit.clone()),
            channel.clone(),
        );
        Fixture {
            ledger,
            audit,
            channel,
            service,
        }
    }

    fn request(transaction_id: &str) -> ReversalRequest {
        ReversalRequest {
            transaction_id: transaction_id.to_string(),
            user_id: "U1".to_string(),
            reason: "duplicate charge".to_string(),
            refund_amount: None,
            void_amount: None,
        }
    }

    #[tokio::test]
    async fn voids_a_completed_transaction() {
        let f = fixture();
        f.ledger.seed(Transaction::new(
            "T1",
            BigDecimal::from(250),
            TransactionStatus::Completed,
        ));

        let outcome = f.service.execute(request("T1")).await.unwrap();

        assert_eq!(outcome.kind, ReversalKind::Void);
        assert_eq!(outcome.derived_transaction_id, "T1-VOID");

        let original = f.ledger.snapshot("T1").unwrap();
        assert_eq!(original.status, TransactionStatus::Voided);
        assert_eq!(original.linked_transaction_id.as_deref(), Some("T1-VOID"));

        let derived = f.ledger.snapshot("T1-VOID").unwrap();
        assert_eq!(derived.amount, BigDecimal::from(-250));
        assert_eq!(f.audit.len(), 1);
        assert_eq!(f.channel.published().len(), 1);
    }

    #[tokio::test]
    async fn refunds_a_finalized_payment_with_the_requested_amount() {
        let f = fixture();
        f.ledger.seed(Transaction::new(
            "T2",
            BigDecimal::from(200),
            TransactionStatus::PaymentSuccess,
        ));

        let mut req = request("T2");
        req.refund_amount = Some(BigDecimal::from(75));
        let outcome = f.service.execute(req).await.unwrap();

        assert_eq!(outcome.kind, ReversalKind::Refund);
        assert_eq!(outcome.derived_transaction_id, "T2-REFUND");

        let derived = f.ledger.snapshot("T2-REFUND").unwrap();
        assert_eq!(derived.amount, BigDecimal::from(-75));
        assert_eq!(derived.status, TransactionStatus::Refunded);

        let entries = f.audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reason, "duplicate charge");
        assert_eq!(entries[0].actor, "U1");
    }

    #[tokio::test]
    async fn terminal_status_is_rejected_without_any_writes() {
        let f = fixture();
        f.ledger.seed(Transaction::new(
            "T3",
            BigDecimal::from(50),
            TransactionStatus::Voided,
        ));

        let err = f.service.execute(request("T3")).await.unwrap_err();

        assert!(matches!(err, AppError::Ineligible { ref status, .. }
            if *status == TransactionStatus::Voided));
        assert!(f.ledger.snapshot("T3-VOID").is_none());
        assert_eq!(f.audit.len(), 0);
        assert!(f.channel.published().is_empty());
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let f = fixture();
        let err = f.service.execute(request("T4")).await.unwrap_err();
        assert!(
            matches!(err, AppError::NotFound(ref message) if message == "Transaction T4 not found")
        );
    }

    #[tokio::test]
    async fn duplicate_submission_is_rejected_and_not_reaudited() {
        let f = fixture();
        f.ledger.seed(Transaction::new(
            "T1",
            BigDecimal::from(250),
            TransactionStatus::Completed,
        ));

        f.service.execute(request("T1")).await.unwrap();
        let err = f.service.execute(request("T1")).await.unwrap_err();

        assert!(matches!(err, AppError::Ineligible { .. }));
        assert_eq!(f.audit.len(), 1);
        assert_eq!(f.channel.published().len(), 1);
    }
}
