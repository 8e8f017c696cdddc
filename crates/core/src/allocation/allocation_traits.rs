use async_trait::async_trait;

use crate::audit::AuditLogEntry;
use crate::errors::Result;

use super::allocation_model::{
    AllocationCommit, AllocationPreview, AllocationRule, AllocationRuleUpdate, AllocationRun,
    NewAllocationRule,
};

/// Trait defining storage operations for allocation rules.
#[async_trait]
pub trait AllocationRuleRepositoryTrait: Send + Sync {
    fn get_by_id(&self, rule_id: &str) -> Result<AllocationRule>;

    /// Lists rules in creation order. Callers that need priority order are
    /// expected to sort; stable sorting then breaks ties by creation.
    fn list(&self, active_only: bool) -> Result<Vec<AllocationRule>>;

    /// Persists the rule and its audit entry as one unit.
    async fn insert(&self, rule: AllocationRule, audit: AuditLogEntry) -> Result<AllocationRule>;

    /// Persists the updated rule and its audit entry as one unit.
    async fn update(&self, rule: AllocationRule, audit: AuditLogEntry) -> Result<AllocationRule>;

    /// Removes the rule and records the audit entry as one unit.
    async fn delete(&self, rule_id: &str, audit: AuditLogEntry) -> Result<()>;
}

/// Trait defining storage operations for allocation runs.
#[async_trait]
pub trait AllocationRunRepositoryTrait: Send + Sync {
    fn get_by_id(&self, run_id: &str) -> Result<AllocationRun>;

    /// Lists runs newest first.
    fn list(&self) -> Result<Vec<AllocationRun>>;

    /// Commits the run record, its ALLOCATION transactions, the matching
    /// fund balance increments, and the audit entry atomically. Fails with
    /// NotFound and persists nothing if any referenced fund has vanished.
    async fn commit_run(&self, commit: AllocationCommit) -> Result<AllocationRun>;
}

/// Trait defining the allocation service: rule management plus the engine's
/// preview and execute surfaces.
#[async_trait]
pub trait AllocationServiceTrait: Send + Sync {
    fn get_rule(&self, rule_id: &str) -> Result<AllocationRule>;
    fn list_rules(&self, active_only: bool) -> Result<Vec<AllocationRule>>;
    async fn create_rule(&self, new_rule: NewAllocationRule) -> Result<AllocationRule>;
    async fn update_rule(
        &self,
        rule_id: &str,
        update: AllocationRuleUpdate,
    ) -> Result<AllocationRule>;
    async fn delete_rule(&self, rule_id: &str) -> Result<()>;

    /// Runs the engine against current rules and funds without persisting
    /// anything.
    fn preview_allocation(&self, deposit_cents: i64) -> Result<AllocationPreview>;

    /// Builds the full commit payload for a deposit: run record,
    /// transactions, and audit entry. Pure apart from clock and id reads;
    /// persisting the payload is the caller's choice.
    fn prepare_commit(&self, deposit_cents: i64, period_id: Option<&str>)
        -> Result<AllocationCommit>;

    /// Prepares and persists an allocation run in one step.
    async fn execute_allocation(
        &self,
        deposit_cents: i64,
        period_id: Option<&str>,
    ) -> Result<AllocationRun>;

    fn get_run(&self, run_id: &str) -> Result<AllocationRun>;
    fn list_runs(&self) -> Result<Vec<AllocationRun>>;
}
