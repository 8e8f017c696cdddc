//! Transfer domain models.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::funds::Fund;
use crate::transactions::Transaction;

/// Input model for a fund-to-fund transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub from_fund_id: String,
    pub to_fund_id: String,
    pub amount_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewTransfer {
    pub fn validate(&self) -> Result<()> {
        if self.from_fund_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "fromFundId".to_string(),
            )));
        }
        if self.to_fund_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "toFundId".to_string(),
            )));
        }
        if self.from_fund_id == self.to_fund_id {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Cannot transfer to the same fund".to_string(),
            )));
        }
        if self.amount_cents <= 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Transfer amount must be greater than 0".to_string(),
            )));
        }
        Ok(())
    }
}

/// Outcome of a committed transfer: both ledger rows plus both funds as they
/// stand after the move, read inside the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferExecution {
    pub transfer_group_id: String,
    pub outgoing: Transaction,
    pub incoming: Transaction,
    pub from_fund: Fund,
    pub to_fund: Fund,
}
