use async_trait::async_trait;
use diesel::SqliteConnection;

use sinkwell_core::audit::AuditLogEntry;
use sinkwell_core::errors::{Error, PreconditionError, Result};
use sinkwell_core::transactions::Transaction;
use sinkwell_core::transfers::{TransferExecution, TransferRepositoryTrait};

use crate::audit::insert_entry;
use crate::db::WriteHandle;
use crate::funds::{apply_balance_delta, load_fund};
use crate::transactions::insert_row;

/// SQLite repository for transfers.
///
/// Transfers have no table of their own; a transfer is a pair of ledger rows
/// sharing a group id. This repository only needs the write handle.
pub struct TransferRepository {
    writer: WriteHandle,
}

impl TransferRepository {
    pub fn new(writer: WriteHandle) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl TransferRepositoryTrait for TransferRepository {
    async fn execute_transfer(
        &self,
        outgoing: Transaction,
        incoming: Transaction,
        audit: AuditLogEntry,
    ) -> Result<TransferExecution> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<TransferExecution> {
                let transfer_group_id = outgoing
                    .transfer_group_id
                    .clone()
                    .ok_or_else(|| Error::Integrity("Transfer leg is missing its group id".to_string()))?;

                let source = load_fund(conn, &outgoing.fund_id)?.ok_or_else(|| {
                    Error::NotFound(format!("Source fund not found: {}", outgoing.fund_id))
                })?;
                load_fund(conn, &incoming.fund_id)?.ok_or_else(|| {
                    Error::NotFound(format!("Destination fund not found: {}", incoming.fund_id))
                })?;

                // Balance re-check inside the transaction: a spend that landed
                // after the service's check fails the whole transfer here.
                if source.balance_cents < outgoing.amount_cents {
                    return Err(PreconditionError::InsufficientBalance {
                        fund_id: source.id,
                        available_cents: source.balance_cents,
                        requested_cents: outgoing.amount_cents,
                    }
                    .into());
                }

                insert_row(conn, &outgoing)?;
                insert_row(conn, &incoming)?;

                apply_balance_delta(conn, &outgoing.fund_id, outgoing.signed_amount())?;
                apply_balance_delta(conn, &incoming.fund_id, incoming.signed_amount())?;

                insert_entry(conn, &audit)?;

                let from_fund = load_fund(conn, &outgoing.fund_id)?.ok_or_else(|| {
                    Error::Integrity(format!("Fund vanished mid-transfer: {}", outgoing.fund_id))
                })?;
                let to_fund = load_fund(conn, &incoming.fund_id)?.ok_or_else(|| {
                    Error::Integrity(format!("Fund vanished mid-transfer: {}", incoming.fund_id))
                })?;

                Ok(TransferExecution {
                    transfer_group_id,
                    outgoing,
                    incoming,
                    from_fund,
                    to_fund,
                })
            })
            .await
    }
}
