#[cfg(test)]
mod tests {
    use crate::allocation::allocation_model::*;
    use crate::allocation::{
        AllocationRuleRepositoryTrait, AllocationRunRepositoryTrait, AllocationService,
        AllocationServiceTrait,
    };
    use crate::audit::{actions, AuditLogEntry};
    use crate::errors::{Error, PreconditionError, Result};
    use crate::funds::{Fund, FundRepositoryTrait};
    use crate::ids::UuidGenerator;
    use crate::transactions::{Transaction, TransactionType};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    // --- Shared in-memory store ---

    #[derive(Default)]
    struct MockStore {
        funds: Mutex<Vec<Fund>>,
        rules: Mutex<Vec<AllocationRule>>,
        runs: Mutex<Vec<AllocationRun>>,
        transactions: Mutex<Vec<Transaction>>,
        audits: Mutex<Vec<AuditLogEntry>>,
    }

    impl MockStore {
        fn add_fund(&self, id: &str, name: &str) {
            let now = Utc::now();
            self.funds.lock().unwrap().push(Fund {
                id: id.to_string(),
                name: name.to_string(),
                description: String::new(),
                color: "#06b6d4".to_string(),
                icon: "💰".to_string(),
                target_cents: None,
                balance_cents: 0,
                is_active: true,
                created_at: now,
                updated_at: now,
            });
        }

        fn balance_of(&self, fund_id: &str) -> i64 {
            self.funds
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.id == fund_id)
                .map(|f| f.balance_cents)
                .unwrap_or_default()
        }

        fn audit_actions(&self) -> Vec<String> {
            self.audits
                .lock()
                .unwrap()
                .iter()
                .map(|a| a.action.clone())
                .collect()
        }
    }

    // --- Mock FundRepository ---

    struct MockFundRepository {
        store: Arc<MockStore>,
    }

    #[async_trait]
    impl FundRepositoryTrait for MockFundRepository {
        fn get_by_id(&self, fund_id: &str) -> Result<Fund> {
            self.store
                .funds
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.id == fund_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Fund not found: {}", fund_id)))
        }

        fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Fund>> {
            let funds = self.store.funds.lock().unwrap();
            Ok(funds
                .iter()
                .filter(|f| is_active_filter.map_or(true, |active| f.is_active == active))
                .cloned()
                .collect())
        }

        async fn insert(&self, _fund: Fund, _audit: AuditLogEntry) -> Result<Fund> {
            unimplemented!("not used in these tests")
        }

        async fn update(&self, _fund: Fund, _audit: AuditLogEntry) -> Result<Fund> {
            unimplemented!("not used in these tests")
        }

        async fn delete(&self, _fund_id: &str, _audit: AuditLogEntry) -> Result<()> {
            unimplemented!("not used in these tests")
        }
    }

    // --- Mock AllocationRuleRepository ---

    struct MockRuleRepository {
        store: Arc<MockStore>,
    }

    #[async_trait]
    impl AllocationRuleRepositoryTrait for MockRuleRepository {
        fn get_by_id(&self, rule_id: &str) -> Result<AllocationRule> {
            self.store
                .rules
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == rule_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Allocation rule not found: {}", rule_id)))
        }

        fn list(&self, active_only: bool) -> Result<Vec<AllocationRule>> {
            let rules = self.store.rules.lock().unwrap();
            Ok(rules
                .iter()
                .filter(|r| !active_only || r.is_active)
                .cloned()
                .collect())
        }

        async fn insert(
            &self,
            rule: AllocationRule,
            audit: AuditLogEntry,
        ) -> Result<AllocationRule> {
            self.store.rules.lock().unwrap().push(rule.clone());
            self.store.audits.lock().unwrap().push(audit);
            Ok(rule)
        }

        async fn update(
            &self,
            rule: AllocationRule,
            audit: AuditLogEntry,
        ) -> Result<AllocationRule> {
            let mut rules = self.store.rules.lock().unwrap();
            let existing = rules
                .iter_mut()
                .find(|r| r.id == rule.id)
                .ok_or_else(|| Error::NotFound(format!("Allocation rule not found: {}", rule.id)))?;
            *existing = rule.clone();
            self.store.audits.lock().unwrap().push(audit);
            Ok(rule)
        }

        async fn delete(&self, rule_id: &str, audit: AuditLogEntry) -> Result<()> {
            self.store.rules.lock().unwrap().retain(|r| r.id != rule_id);
            self.store.audits.lock().unwrap().push(audit);
            Ok(())
        }
    }

    // --- Mock AllocationRunRepository ---

    struct MockRunRepository {
        store: Arc<MockStore>,
    }

    #[async_trait]
    impl AllocationRunRepositoryTrait for MockRunRepository {
        fn get_by_id(&self, run_id: &str) -> Result<AllocationRun> {
            self.store
                .runs
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == run_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Allocation run not found: {}", run_id)))
        }

        fn list(&self) -> Result<Vec<AllocationRun>> {
            Ok(self.store.runs.lock().unwrap().clone())
        }

        async fn commit_run(&self, commit: AllocationCommit) -> Result<AllocationRun> {
            let mut funds = self.store.funds.lock().unwrap();
            // Every fund must still resolve before anything is written.
            for tx in &commit.transactions {
                if !funds.iter().any(|f| f.id == tx.fund_id) {
                    return Err(Error::NotFound(format!("Fund not found: {}", tx.fund_id)));
                }
            }
            for tx in &commit.transactions {
                if let Some(fund) = funds.iter_mut().find(|f| f.id == tx.fund_id) {
                    fund.balance_cents += tx.signed_amount();
                }
            }
            self.store
                .transactions
                .lock()
                .unwrap()
                .extend(commit.transactions);
            self.store.audits.lock().unwrap().push(commit.audit);
            self.store.runs.lock().unwrap().push(commit.run.clone());
            Ok(commit.run)
        }
    }

    fn service(store: &Arc<MockStore>) -> AllocationService {
        AllocationService::new(
            Arc::new(MockRuleRepository {
                store: store.clone(),
            }),
            Arc::new(MockRunRepository {
                store: store.clone(),
            }),
            Arc::new(MockFundRepository {
                store: store.clone(),
            }),
            Arc::new(UuidGenerator),
        )
    }

    fn new_fixed_rule(fund_id: &str, cents: i64, priority: i32) -> NewAllocationRule {
        NewAllocationRule {
            id: None,
            fund_id: fund_id.to_string(),
            mode: RuleMode::Fixed,
            percent_bp: None,
            fixed_cents: Some(cents),
            priority: Some(priority),
            is_active: None,
        }
    }

    fn new_percent_rule(fund_id: &str, bp: i32, priority: i32) -> NewAllocationRule {
        NewAllocationRule {
            id: None,
            fund_id: fund_id.to_string(),
            mode: RuleMode::Percent,
            percent_bp: Some(bp),
            fixed_cents: None,
            priority: Some(priority),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_execute_commits_run_transactions_and_audit() {
        let store = Arc::new(MockStore::default());
        store.add_fund("f1", "Emergency");
        store.add_fund("f2", "Vacation");
        let service = service(&store);

        service.create_rule(new_fixed_rule("f1", 2_000, 1)).await.unwrap();
        service.create_rule(new_percent_rule("f2", 3_000, 2)).await.unwrap();

        let run = service.execute_allocation(10_000, None).await.unwrap();

        assert_eq!(run.deposit_cents, 10_000);
        assert_eq!(run.total_allocated_cents, 5_000);
        assert_eq!(run.remaining_cents, 5_000);
        assert_eq!(run.lines.len(), 2);
        assert!(!run.hash.is_empty());

        assert_eq!(store.balance_of("f1"), 2_000);
        assert_eq!(store.balance_of("f2"), 3_000);

        let transactions = store.transactions.lock().unwrap();
        assert_eq!(transactions.len(), 2);
        for tx in transactions.iter() {
            assert_eq!(tx.transaction_type, TransactionType::Allocation);
            assert_eq!(tx.payee, "Monthly Allocation");
            assert_eq!(tx.note, "Allocation from 100.00 deposit");
            assert_eq!(tx.tags, vec!["allocation".to_string()]);
        }

        let actions_seen = store.audit_actions();
        assert_eq!(
            actions_seen
                .iter()
                .filter(|a| *a == actions::ALLOCATION_EXECUTE)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_preview_has_no_side_effects() {
        let store = Arc::new(MockStore::default());
        store.add_fund("f1", "Emergency");
        let service = service(&store);

        service.create_rule(new_fixed_rule("f1", 2_000, 1)).await.unwrap();
        let audits_before = store.audits.lock().unwrap().len();

        let preview = service.preview_allocation(10_000).unwrap();

        assert_eq!(preview.deposit_cents, 10_000);
        assert_eq!(preview.total_allocated_cents, 2_000);
        assert_eq!(preview.remaining_cents, 8_000);

        assert_eq!(store.balance_of("f1"), 0);
        assert!(store.runs.lock().unwrap().is_empty());
        assert!(store.transactions.lock().unwrap().is_empty());
        assert_eq!(store.audits.lock().unwrap().len(), audits_before);
    }

    #[tokio::test]
    async fn test_execute_rejects_non_positive_deposit() {
        let store = Arc::new(MockStore::default());
        store.add_fund("f1", "Emergency");
        let service = service(&store);

        for deposit in [0, -500] {
            let err = service.execute_allocation(deposit, None).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(store.runs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_requires_at_least_one_fund() {
        let store = Arc::new(MockStore::default());
        let service = service(&store);

        let err = service.execute_allocation(10_000, None).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Precondition(PreconditionError::NoFundsAvailable)
        ));
    }

    #[tokio::test]
    async fn test_create_rule_requires_existing_fund() {
        let store = Arc::new(MockStore::default());
        let service = service(&store);

        let err = service
            .create_rule(new_fixed_rule("ghost", 1_000, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert!(store.rules.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rule_enforces_mode_fields() {
        let store = Arc::new(MockStore::default());
        store.add_fund("f1", "Emergency");
        let service = service(&store);

        let mut bad = new_percent_rule("f1", 3_000, 1);
        bad.percent_bp = None;

        let err = service.create_rule(bad).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_rule_revalidates_merged_state() {
        let store = Arc::new(MockStore::default());
        store.add_fund("f1", "Emergency");
        let service = service(&store);

        let rule = service.create_rule(new_fixed_rule("f1", 2_000, 1)).await.unwrap();

        // Switching mode without the new mode's amount field is rejected.
        let err = service
            .update_rule(
                &rule.id,
                AllocationRuleUpdate {
                    mode: Some(RuleMode::Percent),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // With the field supplied the switch succeeds and the stale fixed
        // amount is gone.
        let updated = service
            .update_rule(
                &rule.id,
                AllocationRuleUpdate {
                    mode: Some(RuleMode::Percent),
                    percent_bp: Some(2_500),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.mode, RuleMode::Percent);
        assert_eq!(updated.percent_bp, Some(2_500));
        assert_eq!(updated.fixed_cents, None);
    }

    #[tokio::test]
    async fn test_rule_lifecycle_is_audited() {
        let store = Arc::new(MockStore::default());
        store.add_fund("f1", "Emergency");
        let service = service(&store);

        let rule = service.create_rule(new_fixed_rule("f1", 2_000, 1)).await.unwrap();
        service
            .update_rule(
                &rule.id,
                AllocationRuleUpdate {
                    priority: Some(7),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service.delete_rule(&rule.id).await.unwrap();

        assert_eq!(
            store.audit_actions(),
            vec![
                actions::RULE_CREATE.to_string(),
                actions::RULE_UPDATE.to_string(),
                actions::RULE_DELETE.to_string(),
            ]
        );
        assert!(store.rules.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_rules_sorts_by_priority_keeping_creation_order() {
        let store = Arc::new(MockStore::default());
        store.add_fund("f1", "Emergency");
        store.add_fund("f2", "Vacation");
        store.add_fund("f3", "Buffer");
        let service = service(&store);

        let late = service.create_rule(new_fixed_rule("f1", 100, 9)).await.unwrap();
        let first_tie = service.create_rule(new_fixed_rule("f2", 100, 1)).await.unwrap();
        let second_tie = service.create_rule(new_fixed_rule("f3", 100, 1)).await.unwrap();

        let listed = service.list_rules(false).unwrap();

        assert_eq!(
            listed.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec![first_tie.id.as_str(), second_tie.id.as_str(), late.id.as_str()]
        );
    }

    #[tokio::test]
    async fn test_prepare_commit_persists_nothing() {
        let store = Arc::new(MockStore::default());
        store.add_fund("f1", "Emergency");
        let service = service(&store);
        service.create_rule(new_fixed_rule("f1", 2_000, 1)).await.unwrap();
        let audits_before = store.audits.lock().unwrap().len();

        let commit = service.prepare_commit(10_000, Some("period-1")).unwrap();

        assert_eq!(commit.run.period_id.as_deref(), Some("period-1"));
        assert_eq!(commit.transactions.len(), 1);
        assert_eq!(commit.audit.action, actions::ALLOCATION_EXECUTE);

        assert!(store.runs.lock().unwrap().is_empty());
        assert!(store.transactions.lock().unwrap().is_empty());
        assert_eq!(store.audits.lock().unwrap().len(), audits_before);
        assert_eq!(store.balance_of("f1"), 0);
    }
}
