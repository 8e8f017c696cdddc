//! SQLite storage implementation for the audit trail.

mod model;
mod repository;

pub use model::AuditLogEntryDB;
pub use repository::AuditRepository;

pub(crate) use repository::insert_entry;
