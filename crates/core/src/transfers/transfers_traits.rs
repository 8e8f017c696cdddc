use async_trait::async_trait;

use crate::audit::AuditLogEntry;
use crate::errors::Result;
use crate::transactions::Transaction;

use super::transfers_model::{NewTransfer, TransferExecution};

/// Trait defining storage operations for transfers.
#[async_trait]
pub trait TransferRepositoryTrait: Send + Sync {
    /// Appends both ledger rows, moves both balances, and records the audit
    /// entry as one atomic unit.
    ///
    /// The source balance is re-checked against the outgoing amount inside
    /// the unit, so a spend that races past the caller's check fails the
    /// whole transfer and persists nothing.
    async fn execute_transfer(
        &self,
        outgoing: Transaction,
        incoming: Transaction,
        audit: AuditLogEntry,
    ) -> Result<TransferExecution>;
}

/// Trait defining the transfer service.
#[async_trait]
pub trait TransferServiceTrait: Send + Sync {
    /// Moves money between two funds as a paired TRANSFER_OUT/TRANSFER_IN.
    async fn transfer_funds(&self, new_transfer: NewTransfer) -> Result<TransferExecution>;
}
