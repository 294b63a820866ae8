//! Append-only audit trail.
//!
//! Every operation against a document leaves an entry. Entries are never
//! updated or deleted, and they outlive the documents they reference.

pub mod entry;
pub mod log;

pub use entry::{AuditAction, AuditEntry};
pub use log::AuditLog;
