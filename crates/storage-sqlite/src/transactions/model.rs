//! Database models for ledger transactions.

use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use sinkwell_core::transactions::{Transaction, TransactionType};

use crate::utils::{parse_datetime_string_tolerant, parse_json_string_tolerant, to_json_string_tolerant};

/// Database model for ledger transactions.
///
/// Rows are append-only; there is no changeset type on purpose.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TransactionDB {
    pub id: String,
    pub fund_id: String,
    pub transaction_type: String,
    pub amount_cents: i64,
    pub date: String,
    pub payee: String,
    pub note: String,
    /// Tags stored as a JSON array of strings.
    pub tags: String,
    pub transfer_group_id: Option<String>,
    pub created_at: String,
}

// Conversion to domain models

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            fund_id: db.fund_id,
            transaction_type: TransactionType::from_str(&db.transaction_type).unwrap_or_else(
                |e| {
                    log::error!(
                        "Failed to parse transaction_type '{}': {}",
                        db.transaction_type,
                        e
                    );
                    TransactionType::default()
                },
            ),
            amount_cents: db.amount_cents,
            date: parse_datetime_string_tolerant(&db.date, "date"),
            payee: db.payee,
            note: db.note,
            tags: parse_json_string_tolerant(&db.tags, "tags"),
            transfer_group_id: db.transfer_group_id,
            created_at: parse_datetime_string_tolerant(&db.created_at, "created_at"),
        }
    }
}

impl From<Transaction> for TransactionDB {
    fn from(domain: Transaction) -> Self {
        Self {
            id: domain.id,
            fund_id: domain.fund_id,
            transaction_type: domain.transaction_type.as_str().to_string(),
            amount_cents: domain.amount_cents,
            date: domain.date.to_rfc3339(),
            payee: domain.payee,
            note: domain.note,
            tags: to_json_string_tolerant(&domain.tags, "tags"),
            transfer_group_id: domain.transfer_group_id,
            created_at: domain.created_at.to_rfc3339(),
        }
    }
}
