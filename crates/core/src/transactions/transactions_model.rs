//! Transaction ledger domain models.
//!
//! The ledger is the authoritative source of balance truth. Rows are
//! immutable once created; corrections are new transactions, never edits.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Type of a ledger transaction. Direction is encoded here, not in the
/// amount's sign: the ledger stores magnitudes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
    Allocation,
    TransferIn,
    TransferOut,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::Allocation => "ALLOCATION",
            TransactionType::TransferIn => "TRANSFER_IN",
            TransactionType::TransferOut => "TRANSFER_OUT",
        }
    }

    /// Signed effect of `amount_cents` on a fund balance.
    ///
    /// INCOME, ALLOCATION, and TRANSFER_IN add; EXPENSE and TRANSFER_OUT
    /// subtract. Single authority for the sign rule; everything that moves
    /// a balance goes through this.
    pub fn signed_amount(&self, amount_cents: i64) -> i64 {
        match self {
            TransactionType::Income | TransactionType::Allocation | TransactionType::TransferIn => {
                amount_cents
            }
            TransactionType::Expense | TransactionType::TransferOut => -amount_cents,
        }
    }

    /// True for the two legs of a transfer pair.
    pub fn is_transfer(&self) -> bool {
        matches!(self, TransactionType::TransferIn | TransactionType::TransferOut)
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            "ALLOCATION" => Ok(TransactionType::Allocation),
            "TRANSFER_IN" => Ok(TransactionType::TransferIn),
            "TRANSFER_OUT" => Ok(TransactionType::TransferOut),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// Domain model representing one immutable ledger row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub fund_id: String,
    pub transaction_type: TransactionType,
    /// Magnitude in cents; always positive.
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub payee: String,
    pub note: String,
    pub tags: Vec<String>,
    /// Pairs the two legs of a transfer; absent on every other type.
    pub transfer_group_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Signed effect of this row on its fund's balance.
    pub fn signed_amount(&self) -> i64 {
        self.transaction_type.signed_amount(self.amount_cents)
    }
}

/// Input model for creating an ordinary ledger transaction.
///
/// Transfer legs are not creatable this way; they only come out of the
/// transfer operation, which owns the pairing invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub fund_id: String,
    #[serde(default)]
    pub transaction_type: TransactionType,
    pub amount_cents: i64,
    pub date: Option<DateTime<Utc>>,
    pub payee: Option<String>,
    pub note: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NewTransaction {
    /// Validates the new transaction data.
    pub fn validate(&self) -> Result<()> {
        if self.fund_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "fundId".to_string(),
            )));
        }
        if self.amount_cents <= 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Amount must be a positive number of cents".to_string(),
            )));
        }
        if self.transaction_type.is_transfer() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Transfer transactions are created through the transfer operation".to_string(),
            )));
        }
        Ok(())
    }

    /// Builds the ledger row, applying creation defaults.
    pub fn into_transaction(self, id: String, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            fund_id: self.fund_id,
            transaction_type: self.transaction_type,
            amount_cents: self.amount_cents,
            date: self.date.unwrap_or(now),
            payee: self.payee.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            transfer_group_id: None,
            created_at: now,
        }
    }
}
