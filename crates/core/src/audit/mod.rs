//! Append-only checkout audit trail.

pub mod idempotency;
pub mod types;

pub use idempotency::IdempotencyKey;
pub use types::LogEntry;
