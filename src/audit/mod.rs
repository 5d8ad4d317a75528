//! Audit logging for Cashbook
//!
//! Records every create, update and delete with before/after values in an
//! append-only, line-delimited JSON file.
//!
//! - `AuditEntry`: one operation on one entity.
//! - `AuditLogger`: appends entries to `audit.log` and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
