use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use sinkwell_core::audit::AuditLogEntry;
use sinkwell_core::funds::{Fund, FundRepositoryTrait};
use sinkwell_core::{Error, Result};

use super::model::{FundChangesDB, FundDB};
use crate::audit::insert_entry;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::funds;

/// Loads a fund row inside an open transaction.
pub(crate) fn load_fund(conn: &mut SqliteConnection, fund_id: &str) -> Result<Option<Fund>> {
    let fund_db = funds::table
        .find(fund_id)
        .select(FundDB::as_select())
        .first::<FundDB>(conn)
        .optional()
        .map_err(StorageError::from)?;
    Ok(fund_db.map(Fund::from))
}

/// Applies a signed delta to a fund's balance inside an open transaction.
///
/// Fails with NotFound when the fund row is gone, rolling back whatever
/// unit the caller was building around the balance move.
pub(crate) fn apply_balance_delta(
    conn: &mut SqliteConnection,
    fund_id: &str,
    delta_cents: i64,
) -> Result<()> {
    let affected = diesel::update(funds::table.find(fund_id))
        .set(funds::balance_cents.eq(funds::balance_cents + delta_cents))
        .execute(conn)
        .map_err(StorageError::from)?;
    if affected == 0 {
        return Err(Error::NotFound(format!("Fund not found: {}", fund_id)));
    }
    Ok(())
}

pub struct FundRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl FundRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        FundRepository { pool, writer }
    }
}

#[async_trait]
impl FundRepositoryTrait for FundRepository {
    fn get_by_id(&self, fund_id: &str) -> Result<Fund> {
        let mut conn = get_connection(&self.pool)?;
        let fund_db = funds::table
            .find(fund_id)
            .select(FundDB::as_select())
            .first::<FundDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::NotFound(format!("Fund not found: {}", fund_id)))?;
        Ok(Fund::from(fund_db))
    }

    fn list(&self, is_active_filter: Option<bool>) -> Result<Vec<Fund>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = funds::table.select(FundDB::as_select()).into_boxed();
        if let Some(is_active) = is_active_filter {
            query = query.filter(funds::is_active.eq(is_active));
        }

        let funds_db = query
            .order(funds::created_at.asc())
            .load::<FundDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(funds_db.into_iter().map(Fund::from).collect())
    }

    async fn insert(&self, fund: Fund, audit: AuditLogEntry) -> Result<Fund> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Fund> {
                let fund_db = FundDB::from(fund.clone());
                diesel::insert_into(funds::table)
                    .values(&fund_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                insert_entry(conn, &audit)?;
                Ok(fund)
            })
            .await
    }

    async fn update(&self, fund: Fund, audit: AuditLogEntry) -> Result<Fund> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Fund> {
                let changes = FundChangesDB::from(fund.clone());
                let affected = diesel::update(funds::table.find(&fund.id))
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!("Fund not found: {}", fund.id)));
                }
                insert_entry(conn, &audit)?;

                // Re-read so the returned balance reflects the stored row,
                // not the caller's possibly stale copy.
                let fund_db = funds::table
                    .find(&fund.id)
                    .select(FundDB::as_select())
                    .first::<FundDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Fund::from(fund_db))
            })
            .await
    }

    async fn delete(&self, fund_id: &str, audit: AuditLogEntry) -> Result<()> {
        let fund_id = fund_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::delete(funds::table.find(&fund_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!("Fund not found: {}", fund_id)));
                }
                insert_entry(conn, &audit)?;
                Ok(())
            })
            .await
    }
}
