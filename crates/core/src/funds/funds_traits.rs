//! Fund repository and service traits.
//!
//! These traits define the contract for fund operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::funds_model::{Fund, FundUpdate, NewFund};
use crate::audit::AuditLogEntry;
use crate::errors::Result;

/// Trait defining the contract for Fund repository operations.
///
/// Mutating methods receive fully-built rows, including the audit entry
/// describing the change, and must persist both as one atomic unit.
#[async_trait]
pub trait FundRepositoryTrait: Send + Sync {
    /// Retrieves a fund by its ID.
    fn get_by_id(&self, fund_id: &str) -> Result<Fund>;

    /// Lists funds, optionally filtered by active status.
    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Fund>>;

    /// Inserts a new fund together with its audit entry.
    async fn insert(&self, fund: Fund, audit: AuditLogEntry) -> Result<Fund>;

    /// Replaces an existing fund row together with its audit entry.
    ///
    /// The balance column is not written by this method; balances move only
    /// through ledger operations.
    async fn update(&self, fund: Fund, audit: AuditLogEntry) -> Result<Fund>;

    /// Deletes a fund together with its audit entry.
    ///
    /// Ledger rows referencing the fund remain; history is never destroyed.
    async fn delete(&self, fund_id: &str, audit: AuditLogEntry) -> Result<()>;
}

/// Trait defining the contract for Fund service operations.
#[async_trait]
pub trait FundServiceTrait: Send + Sync {
    /// Retrieves a fund by ID.
    fn get_fund(&self, fund_id: &str) -> Result<Fund>;

    /// Lists funds, optionally filtered by active status.
    fn list_funds(&self, is_active_filter: Option<bool>) -> Result<Vec<Fund>>;

    /// Creates a new fund with business validation.
    async fn create_fund(&self, new_fund: NewFund) -> Result<Fund>;

    /// Applies a validated patch to an existing fund.
    async fn update_fund(&self, fund_id: &str, update: FundUpdate) -> Result<Fund>;

    /// Deletes a fund by ID.
    async fn delete_fund(&self, fund_id: &str) -> Result<()>;
}
