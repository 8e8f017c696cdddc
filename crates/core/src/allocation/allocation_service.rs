use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde_json::json;

use crate::audit::{actions, AuditLogEntry};
use crate::constants::{ALLOCATION_PAYEE, ALLOCATION_TAG};
use crate::errors::{Error, PreconditionError, Result, ValidationError};
use crate::funds::{Fund, FundRepositoryTrait};
use crate::ids::IdGenerator;
use crate::transactions::{Transaction, TransactionType};

use super::allocation_engine;
use super::allocation_model::{
    compute_run_hash, AllocationCommit, AllocationPreview, AllocationResult, AllocationRule,
    AllocationRuleUpdate, AllocationRun, NewAllocationRule,
};
use super::allocation_traits::{
    AllocationRuleRepositoryTrait, AllocationRunRepositoryTrait, AllocationServiceTrait,
};

/// Service for managing allocation rules and running the engine.
pub struct AllocationService {
    rule_repository: Arc<dyn AllocationRuleRepositoryTrait>,
    run_repository: Arc<dyn AllocationRunRepositoryTrait>,
    fund_repository: Arc<dyn FundRepositoryTrait>,
    ids: Arc<dyn IdGenerator>,
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

impl AllocationService {
    pub fn new(
        rule_repository: Arc<dyn AllocationRuleRepositoryTrait>,
        run_repository: Arc<dyn AllocationRunRepositoryTrait>,
        fund_repository: Arc<dyn FundRepositoryTrait>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            rule_repository,
            run_repository,
            fund_repository,
            ids,
        }
    }

    /// Loads current rules and funds and runs the engine over them.
    fn compute(&self, deposit_cents: i64) -> Result<AllocationResult> {
        if deposit_cents <= 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Deposit must be a positive amount of cents".to_string(),
            )));
        }

        let funds = self.fund_repository.list(None)?;
        if funds.is_empty() {
            return Err(Error::Precondition(PreconditionError::NoFundsAvailable));
        }
        let funds_by_id: HashMap<String, Fund> =
            funds.into_iter().map(|fund| (fund.id.clone(), fund)).collect();

        let rules = self.rule_repository.list(true)?;

        Ok(allocation_engine::allocate(
            deposit_cents,
            &rules,
            &funds_by_id,
        ))
    }
}

#[async_trait]
impl AllocationServiceTrait for AllocationService {
    fn get_rule(&self, rule_id: &str) -> Result<AllocationRule> {
        self.rule_repository.get_by_id(rule_id)
    }

    fn list_rules(&self, active_only: bool) -> Result<Vec<AllocationRule>> {
        let mut rules = self.rule_repository.list(active_only)?;
        // Stable sort over creation order, so equal priorities keep it.
        rules.sort_by_key(|rule| rule.priority);
        Ok(rules)
    }

    async fn create_rule(&self, new_rule: NewAllocationRule) -> Result<AllocationRule> {
        let id = new_rule
            .id
            .clone()
            .unwrap_or_else(|| self.ids.generate());
        let rule = new_rule.into_rule(id, Utc::now())?;

        // The target fund must resolve at creation time; it may still be
        // deleted later, which the engine tolerates by skipping the rule.
        self.fund_repository.get_by_id(&rule.fund_id)?;

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::RULE_CREATE,
            json!({
                "ruleId": rule.id,
                "fundId": rule.fund_id,
                "mode": rule.mode.as_str(),
                "percentBp": rule.percent_bp,
                "fixedCents": rule.fixed_cents,
                "priority": rule.priority,
            }),
        );

        self.rule_repository.insert(rule, audit).await
    }

    async fn update_rule(
        &self,
        rule_id: &str,
        update: AllocationRuleUpdate,
    ) -> Result<AllocationRule> {
        let existing = self.rule_repository.get_by_id(rule_id)?;
        let updated = update.apply_to(existing, Utc::now())?;

        self.fund_repository.get_by_id(&updated.fund_id)?;

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::RULE_UPDATE,
            json!({
                "ruleId": updated.id,
                "fundId": updated.fund_id,
                "mode": updated.mode.as_str(),
                "percentBp": updated.percent_bp,
                "fixedCents": updated.fixed_cents,
                "priority": updated.priority,
                "isActive": updated.is_active,
            }),
        );

        self.rule_repository.update(updated, audit).await
    }

    async fn delete_rule(&self, rule_id: &str) -> Result<()> {
        let rule = self.rule_repository.get_by_id(rule_id)?;

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::RULE_DELETE,
            json!({
                "ruleId": rule.id,
                "fundId": rule.fund_id,
                "mode": rule.mode.as_str(),
            }),
        );

        self.rule_repository.delete(rule_id, audit).await
    }

    fn preview_allocation(&self, deposit_cents: i64) -> Result<AllocationPreview> {
        let result = self.compute(deposit_cents)?;
        Ok(AllocationPreview {
            deposit_cents,
            lines: result.lines,
            total_allocated_cents: result.total_allocated_cents,
            remaining_cents: result.remaining_cents,
        })
    }

    fn prepare_commit(
        &self,
        deposit_cents: i64,
        period_id: Option<&str>,
    ) -> Result<AllocationCommit> {
        let result = self.compute(deposit_cents)?;
        let executed_at = Utc::now();
        let note = format!("Allocation from {} deposit", format_cents(deposit_cents));

        let transactions: Vec<Transaction> = result
            .lines
            .iter()
            .map(|line| Transaction {
                id: self.ids.generate(),
                fund_id: line.fund_id.clone(),
                transaction_type: TransactionType::Allocation,
                amount_cents: line.amount_cents,
                date: executed_at,
                payee: ALLOCATION_PAYEE.to_string(),
                note: note.clone(),
                tags: vec![ALLOCATION_TAG.to_string()],
                transfer_group_id: None,
                created_at: executed_at,
            })
            .collect();

        let hash = compute_run_hash(deposit_cents, period_id, &executed_at, &result.lines);
        let run = AllocationRun {
            id: self.ids.generate(),
            period_id: period_id.map(|p| p.to_string()),
            deposit_cents,
            total_allocated_cents: result.total_allocated_cents,
            remaining_cents: result.remaining_cents,
            lines: result.lines,
            executed_at,
            hash,
        };

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::ALLOCATION_EXECUTE,
            json!({
                "runId": run.id,
                "periodId": run.period_id,
                "depositCents": deposit_cents,
                "totalAllocatedCents": run.total_allocated_cents,
                "remainingCents": run.remaining_cents,
                "lineCount": run.lines.len(),
            }),
        );

        Ok(AllocationCommit {
            run,
            transactions,
            audit,
        })
    }

    async fn execute_allocation(
        &self,
        deposit_cents: i64,
        period_id: Option<&str>,
    ) -> Result<AllocationRun> {
        let commit = self.prepare_commit(deposit_cents, period_id)?;
        debug!(
            "Executing allocation run {}: {} cents across {} funds",
            commit.run.id,
            deposit_cents,
            commit.transactions.len()
        );
        self.run_repository.commit_run(commit).await
    }

    fn get_run(&self, run_id: &str) -> Result<AllocationRun> {
        self.run_repository.get_by_id(run_id)
    }

    fn list_runs(&self) -> Result<Vec<AllocationRun>> {
        self.run_repository.list()
    }
}
