//! Audit logging
//!
//! Every create, update and delete made through the services is appended to
//! `audit.log` as one JSON line carrying before/after snapshots.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
