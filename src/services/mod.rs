pub mod audit_recorder;
pub mod reversal;
pub mod void_preview;

pub use audit_recorder::AuditRecorder;
pub use reversal::{ReversalOutcome, ReversalService};
pub use void_preview::VoidPreview;
