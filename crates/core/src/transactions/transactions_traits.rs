//! Transaction ledger repository and service traits.

use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction};
use crate::audit::AuditLogEntry;
use crate::errors::Result;

/// Trait defining the contract for ledger persistence.
///
/// The ledger is append-only; no update or delete methods exist. Appends
/// receive fully-built rows plus the audit entry and must land the row, the
/// fund's balance delta, and the entry as one atomic unit.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Retrieves a transaction by its ID.
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;

    /// Lists transactions newest-date-first, optionally filtered by fund.
    fn list(&self, fund_id: Option<&str>) -> Result<Vec<Transaction>>;

    /// Appends one row and applies its signed amount to the fund's balance.
    ///
    /// Fails with NotFound (and rolls the unit back) if the fund no longer
    /// exists at commit time.
    async fn append(&self, transaction: Transaction, audit: AuditLogEntry) -> Result<Transaction>;

    /// Signed sum of every ledger row referencing the fund.
    ///
    /// This is the reconciliation truth the cached fund balance must equal.
    fn sum_for_fund(&self, fund_id: &str) -> Result<i64>;
}

/// Trait defining the contract for ledger service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Retrieves a transaction by ID.
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Lists transactions newest-date-first, optionally filtered by fund.
    fn list_transactions(&self, fund_id: Option<&str>) -> Result<Vec<Transaction>>;

    /// Creates an ordinary transaction and applies its balance delta.
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
}
