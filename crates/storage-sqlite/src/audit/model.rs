//! Database models for audit log entries.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use sinkwell_core::audit::AuditLogEntry;

use crate::utils::{parse_datetime_string_tolerant, parse_json_string_tolerant, to_json_string_tolerant};

/// Database model for audit log entries
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::audit_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntryDB {
    pub id: String,
    pub action: String,
    /// Structured action payload stored as JSON text.
    pub context: String,
    pub created_at: String,
}

// Conversion to domain models

impl From<AuditLogEntryDB> for AuditLogEntry {
    fn from(db: AuditLogEntryDB) -> Self {
        Self {
            id: db.id,
            action: db.action,
            context: parse_json_string_tolerant::<Value>(&db.context, "context"),
            created_at: parse_datetime_string_tolerant(&db.created_at, "created_at"),
        }
    }
}

impl From<AuditLogEntry> for AuditLogEntryDB {
    fn from(domain: AuditLogEntry) -> Self {
        Self {
            id: domain.id,
            action: domain.action,
            context: to_json_string_tolerant(&domain.context, "context"),
            created_at: domain.created_at.to_rfc3339(),
        }
    }
}
