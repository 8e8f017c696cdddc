use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::allocation::AllocationCommit;
use crate::audit::AuditLogEntry;
use crate::errors::Result;

use super::periods_model::{Period, PeriodStartRequest, PeriodStartResult, PeriodStatus};

/// Trait defining storage operations for periods.
#[async_trait]
pub trait PeriodRepositoryTrait: Send + Sync {
    fn get_by_id(&self, period_id: &str) -> Result<Period>;

    fn find_by_month(&self, year: i32, month: u32) -> Result<Option<Period>>;

    /// Lists periods newest first (year, then month, descending).
    fn list(&self, status_filter: Option<PeriodStatus>) -> Result<Vec<Period>>;

    /// Inserts the period, the optional allocation commit bound to it, and
    /// the audit entry as one atomic unit. A (year, month) collision fails
    /// the lot with a DuplicatePeriod precondition.
    async fn insert(
        &self,
        period: Period,
        allocation: Option<AllocationCommit>,
        audit: AuditLogEntry,
    ) -> Result<Period>;

    /// Marks the period CLOSED and records the audit entry as one unit.
    /// The already-closed guard is re-evaluated inside the unit.
    async fn close(
        &self,
        period_id: &str,
        closed_at: DateTime<Utc>,
        audit: AuditLogEntry,
    ) -> Result<Period>;

    /// Marks the period OPEN again, clearing `closed_at`, and records the
    /// audit entry as one unit. The already-open guard is re-evaluated
    /// inside the unit.
    async fn reopen(&self, period_id: &str, audit: AuditLogEntry) -> Result<Period>;
}

/// Trait defining the period service: the period state machine.
#[async_trait]
pub trait PeriodServiceTrait: Send + Sync {
    fn get_period(&self, period_id: &str) -> Result<Period>;

    fn list_periods(&self, status_filter: Option<PeriodStatus>) -> Result<Vec<Period>>;

    /// Starts a period for the current month. Rejected when any period
    /// already exists for the month, whatever its status.
    async fn start_period(&self, request: PeriodStartRequest) -> Result<PeriodStartResult>;

    async fn close_period(&self, period_id: &str, reason: Option<String>) -> Result<Period>;

    async fn reopen_period(&self, period_id: &str, reason: Option<String>) -> Result<Period>;

    /// Returns the current month's period, lazily creating an OPEN one when
    /// no record exists. Callers never observe an absent current period.
    async fn get_current_period(&self) -> Result<Period>;
}
