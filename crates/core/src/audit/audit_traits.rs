//! Audit trail repository and service traits.
//!
//! These traits define the contract for audit trail operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use serde_json::Value;

use super::audit_model::{AuditLogEntry, AuditLogFilter, AuditLogResponse};
use crate::errors::Result;

/// Trait defining the contract for audit trail persistence.
///
/// The trail is append-only: there are no update or delete operations.
#[async_trait]
pub trait AuditRepositoryTrait: Send + Sync {
    /// Lists entries newest-first, filtered and paginated.
    fn list(&self, filter: &AuditLogFilter) -> Result<AuditLogResponse>;

    /// Appends a single entry.
    ///
    /// Mutations elsewhere in the crate do not go through this method; their
    /// repositories write the entry inside the same transaction as the
    /// mutation itself. This standalone append exists for callers recording
    /// actions of their own.
    async fn append(&self, entry: AuditLogEntry) -> Result<AuditLogEntry>;
}

/// Trait defining the contract for audit trail operations.
#[async_trait]
pub trait AuditServiceTrait: Send + Sync {
    /// Lists entries newest-first, filtered and paginated.
    fn list_audit_logs(&self, filter: AuditLogFilter) -> Result<AuditLogResponse>;

    /// Records a completed action with a structured context payload.
    async fn record(&self, action: &str, context: Value) -> Result<AuditLogEntry>;
}
