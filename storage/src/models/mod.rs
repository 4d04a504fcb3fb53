//! Persistent models: user record, role history entry, audit entry.

mod audit_entry;
mod role_history;
mod user_record;

pub use audit_entry::AuditEntry;
pub use role_history::{RemovalReason, RoleHistoryEntry};
pub use user_record::{RoleState, UserRecord};
