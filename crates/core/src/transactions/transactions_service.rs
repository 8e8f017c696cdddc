use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde_json::json;

use super::transactions_model::{NewTransaction, Transaction};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::audit::{actions, AuditLogEntry};
use crate::errors::Result;
use crate::funds::FundRepositoryTrait;
use crate::ids::IdGenerator;

/// Service for the transaction ledger.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    fund_repository: Arc<dyn FundRepositoryTrait>,
    ids: Arc<dyn IdGenerator>,
}

impl TransactionService {
    /// Creates a new TransactionService instance.
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        fund_repository: Arc<dyn FundRepositoryTrait>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            repository,
            fund_repository,
            ids,
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_by_id(transaction_id)
    }

    fn list_transactions(&self, fund_id: Option<&str>) -> Result<Vec<Transaction>> {
        self.repository.list(fund_id)
    }

    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        // Resolve the fund up front; the repository re-checks inside the unit.
        let fund = self.fund_repository.get_by_id(&new_transaction.fund_id)?;

        let transaction = new_transaction.into_transaction(self.ids.generate(), Utc::now());
        debug!(
            "Appending {} of {} cents to fund {}",
            transaction.transaction_type.as_str(),
            transaction.amount_cents,
            fund.id
        );

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::TRANSACTION_CREATE,
            json!({
                "transactionId": transaction.id,
                "fundId": transaction.fund_id,
                "type": transaction.transaction_type.as_str(),
                "amountCents": transaction.amount_cents,
            }),
        );
        self.repository.append(transaction, audit).await
    }
}
