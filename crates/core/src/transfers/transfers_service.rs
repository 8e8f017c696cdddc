use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde_json::json;

use crate::audit::{actions, AuditLogEntry};
use crate::constants::TRANSFER_TAG;
use crate::errors::{Error, PreconditionError, Result};
use crate::funds::FundRepositoryTrait;
use crate::ids::IdGenerator;
use crate::transactions::{Transaction, TransactionType};

use super::transfers_model::{NewTransfer, TransferExecution};
use super::transfers_traits::{TransferRepositoryTrait, TransferServiceTrait};

/// Service for moving money between funds.
pub struct TransferService {
    repository: Arc<dyn TransferRepositoryTrait>,
    fund_repository: Arc<dyn FundRepositoryTrait>,
    ids: Arc<dyn IdGenerator>,
}

impl TransferService {
    pub fn new(
        repository: Arc<dyn TransferRepositoryTrait>,
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
impl TransferServiceTrait for TransferService {
    async fn transfer_funds(&self, new_transfer: NewTransfer) -> Result<TransferExecution> {
        new_transfer.validate()?;

        let from_fund = self
            .fund_repository
            .get_by_id(&new_transfer.from_fund_id)
            .map_err(|_| {
                Error::NotFound(format!(
                    "Source fund not found: {}",
                    new_transfer.from_fund_id
                ))
            })?;
        let to_fund = self
            .fund_repository
            .get_by_id(&new_transfer.to_fund_id)
            .map_err(|_| {
                Error::NotFound(format!(
                    "Destination fund not found: {}",
                    new_transfer.to_fund_id
                ))
            })?;

        // Friendly pre-check; the repository re-verifies inside the unit.
        if from_fund.balance_cents < new_transfer.amount_cents {
            return Err(Error::Precondition(PreconditionError::InsufficientBalance {
                fund_id: from_fund.id.clone(),
                available_cents: from_fund.balance_cents,
                requested_cents: new_transfer.amount_cents,
            }));
        }

        let transfer_group_id = self.ids.generate();
        let now = Utc::now();

        let outgoing = Transaction {
            id: self.ids.generate(),
            fund_id: from_fund.id.clone(),
            transaction_type: TransactionType::TransferOut,
            amount_cents: new_transfer.amount_cents,
            date: now,
            payee: format!("Transfer to {}", to_fund.name),
            note: new_transfer
                .note
                .clone()
                .unwrap_or_else(|| format!("Transferred to {}", to_fund.name)),
            tags: vec![TRANSFER_TAG.to_string()],
            transfer_group_id: Some(transfer_group_id.clone()),
            created_at: now,
        };

        let incoming = Transaction {
            id: self.ids.generate(),
            fund_id: to_fund.id.clone(),
            transaction_type: TransactionType::TransferIn,
            amount_cents: new_transfer.amount_cents,
            date: now,
            payee: format!("Transfer from {}", from_fund.name),
            note: new_transfer
                .note
                .clone()
                .unwrap_or_else(|| format!("Transferred from {}", from_fund.name)),
            tags: vec![TRANSFER_TAG.to_string()],
            transfer_group_id: Some(transfer_group_id.clone()),
            created_at: now,
        };

        let audit = AuditLogEntry::new(
            self.ids.generate(),
            actions::TRANSFER_FUNDS,
            json!({
                "transferGroupId": transfer_group_id,
                "fromFundId": from_fund.id,
                "toFundId": to_fund.id,
                "fromFundName": from_fund.name,
                "toFundName": to_fund.name,
                "amountCents": new_transfer.amount_cents,
                "note": new_transfer.note.unwrap_or_default(),
            }),
        );

        debug!(
            "Transferring {} cents from {} to {} (group {})",
            new_transfer.amount_cents, from_fund.id, to_fund.id, transfer_group_id
        );

        self.repository
            .execute_transfer(outgoing, incoming, audit)
            .await
    }
}
