use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use sinkwell_core::audit::AuditLogEntry;
use sinkwell_core::transactions::{Transaction, TransactionRepositoryTrait, TransactionType};
use sinkwell_core::{Error, Result};

use super::model::TransactionDB;
use crate::audit::insert_entry;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::funds::apply_balance_delta;
use crate::schema::transactions;

/// Appends a ledger row inside an open transaction.
///
/// The matching balance move is the caller's responsibility; composite
/// operations batch several rows before touching balances.
pub(crate) fn insert_row(conn: &mut SqliteConnection, transaction: &Transaction) -> Result<()> {
    let transaction_db = TransactionDB::from(transaction.clone());
    diesel::insert_into(transactions::table)
        .values(&transaction_db)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

pub struct TransactionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        TransactionRepository { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let transaction_db = transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::NotFound(format!("Transaction not found: {}", transaction_id)))?;
        Ok(Transaction::from(transaction_db))
    }

    fn list(&self, fund_id: Option<&str>) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .select(TransactionDB::as_select())
            .into_boxed();
        if let Some(fund_id) = fund_id {
            query = query.filter(transactions::fund_id.eq(fund_id.to_string()));
        }

        let transactions_db = query
            .order((transactions::date.desc(), transactions::created_at.desc()))
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(transactions_db
            .into_iter()
            .map(Transaction::from)
            .collect())
    }

    async fn append(&self, transaction: Transaction, audit: AuditLogEntry) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                // The delta update doubles as the fund existence check.
                apply_balance_delta(conn, &transaction.fund_id, transaction.signed_amount())?;
                insert_row(conn, &transaction)?;
                insert_entry(conn, &audit)?;
                Ok(transaction)
            })
            .await
    }

    fn sum_for_fund(&self, fund_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .filter(transactions::fund_id.eq(fund_id))
            .select((transactions::transaction_type, transactions::amount_cents))
            .load::<(String, i64)>(&mut conn)
            .map_err(StorageError::from)?;

        // Summed in Rust so the sign rule stays with TransactionType.
        Ok(rows.iter().fold(0i64, |acc, (type_str, amount_cents)| {
            match TransactionType::from_str(type_str) {
                Ok(transaction_type) => acc + transaction_type.signed_amount(*amount_cents),
                Err(e) => {
                    log::error!("Failed to parse transaction_type '{}': {}", type_str, e);
                    acc
                }
            }
        }))
    }
}
