//! Audit trail domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Well-known audit action tags.
///
/// The trail accepts free-form tags through `record`, but every mutation in
/// this crate writes one of these.
pub mod actions {
    pub const FUND_CREATE: &str = "FUND_CREATE";
    pub const FUND_UPDATE: &str = "FUND_UPDATE";
    pub const FUND_DELETE: &str = "FUND_DELETE";
    pub const TRANSACTION_CREATE: &str = "TRANSACTION_CREATE";
    pub const RULE_CREATE: &str = "RULE_CREATE";
    pub const RULE_UPDATE: &str = "RULE_UPDATE";
    pub const RULE_DELETE: &str = "RULE_DELETE";
    pub const ALLOCATION_EXECUTE: &str = "ALLOCATION_EXECUTE";
    pub const TRANSFER_FUNDS: &str = "TRANSFER_FUNDS";
    pub const PERIOD_START: &str = "PERIOD_START";
    pub const PERIOD_CLOSE: &str = "PERIOD_CLOSE";
    pub const PERIOD_REOPEN: &str = "PERIOD_REOPEN";
}

/// Append-only record of one completed state-changing action.
///
/// Entries are written in the same atomic unit as the mutation they
/// describe; a failed operation never leaves one behind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    /// Action tag, e.g. `PERIOD_CLOSE` or `TRANSFER_FUNDS`.
    pub action: String,
    /// Structured payload describing the action.
    pub context: Value,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(id: String, action: &str, context: Value) -> Self {
        Self {
            id,
            action: action.to_string(),
            context,
            created_at: Utc::now(),
        }
    }
}

/// Filter and paging options for audit listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogFilter {
    pub action: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl AuditLogFilter {
    /// Effective page number (1-based).
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    /// Effective page size.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }
}

/// One page of audit entries plus paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub data: Vec<AuditLogEntry>,
    pub meta: AuditLogResponseMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponseMeta {
    pub page: i64,
    pub limit: i64,
    pub total_count: i64,
    pub total_pages: i64,
}
