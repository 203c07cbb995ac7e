//! Audit logging for cardcycle
//!
//! Every create, update and delete performed through the service layer is
//! appended to `audit.log` as one JSON line, with the entity state before
//! and after the change.
//!
//! - `AuditEntry`: timestamp, operation, entity and optional snapshots
//! - `AuditLogger`: appends to and reads back the JSONL file
//! - `generate_diff`: short field-by-field summary of an update

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
