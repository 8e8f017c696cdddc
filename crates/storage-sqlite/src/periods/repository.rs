use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use sinkwell_core::allocation::AllocationCommit;
use sinkwell_core::audit::AuditLogEntry;
use sinkwell_core::errors::{Error, PreconditionError, Result};
use sinkwell_core::periods::{Period, PeriodRepositoryTrait, PeriodStatus};

use crate::allocation::insert_commit;
use crate::audit::insert_entry;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::periods::PeriodDB;
use crate::schema::periods;

/// SQLite repository for periods.
pub struct PeriodRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PeriodRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn load_period(conn: &mut SqliteConnection, period_id: &str) -> Result<Option<Period>> {
    let period_db = periods::table
        .find(period_id)
        .select(PeriodDB::as_select())
        .first::<PeriodDB>(conn)
        .optional()
        .map_err(StorageError::from)?;

    Ok(period_db.map(Period::from))
}

#[async_trait]
impl PeriodRepositoryTrait for PeriodRepository {
    fn get_by_id(&self, period_id: &str) -> Result<Period> {
        let mut conn = get_connection(&self.pool)?;

        load_period(&mut conn, period_id)?
            .ok_or_else(|| Error::NotFound(format!("Period not found: {}", period_id)))
    }

    fn find_by_month(&self, year: i32, month: u32) -> Result<Option<Period>> {
        let mut conn = get_connection(&self.pool)?;

        let period_db = periods::table
            .filter(periods::year.eq(year))
            .filter(periods::month.eq(month as i32))
            .select(PeriodDB::as_select())
            .first::<PeriodDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(period_db.map(Period::from))
    }

    fn list(&self, status_filter: Option<PeriodStatus>) -> Result<Vec<Period>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = periods::table
            .select(PeriodDB::as_select())
            .into_boxed();

        if let Some(status) = status_filter {
            query = query.filter(periods::status.eq(status.as_str()));
        }

        let period_dbs = query
            .order((periods::year.desc(), periods::month.desc()))
            .load::<PeriodDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(period_dbs.into_iter().map(Period::from).collect())
    }

    async fn insert(
        &self,
        period: Period,
        allocation: Option<AllocationCommit>,
        audit: AuditLogEntry,
    ) -> Result<Period> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Period> {
                // Re-check inside the transaction: the single writer makes
                // check-then-insert race-free, and the unique index on
                // (year, month) backstops it.
                let existing: i64 = periods::table
                    .filter(periods::year.eq(period.year))
                    .filter(periods::month.eq(period.month as i32))
                    .count()
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                if existing > 0 {
                    return Err(PreconditionError::DuplicatePeriod {
                        year: period.year,
                        month: period.month,
                    }
                    .into());
                }

                let period_db = PeriodDB::from(period.clone());
                diesel::insert_into(periods::table)
                    .values(&period_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                if let Some(commit) = &allocation {
                    insert_commit(conn, commit)?;
                }

                insert_entry(conn, &audit)?;

                Ok(period)
            })
            .await
    }

    async fn close(
        &self,
        period_id: &str,
        closed_at: DateTime<Utc>,
        audit: AuditLogEntry,
    ) -> Result<Period> {
        let period_id = period_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Period> {
                let period = load_period(conn, &period_id)?
                    .ok_or_else(|| Error::NotFound(format!("Period not found: {}", period_id)))?;

                if period.status == PeriodStatus::Closed {
                    return Err(PreconditionError::PeriodAlreadyClosed {
                        period_id: period_id.clone(),
                    }
                    .into());
                }

                diesel::update(periods::table.find(&period_id))
                    .set((
                        periods::status.eq(PeriodStatus::Closed.as_str()),
                        periods::closed_at.eq(Some(closed_at.to_rfc3339())),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                insert_entry(conn, &audit)?;

                Ok(Period {
                    status: PeriodStatus::Closed,
                    closed_at: Some(closed_at),
                    ..period
                })
            })
            .await
    }

    async fn reopen(&self, period_id: &str, audit: AuditLogEntry) -> Result<Period> {
        let period_id = period_id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Period> {
                let period = load_period(conn, &period_id)?
                    .ok_or_else(|| Error::NotFound(format!("Period not found: {}", period_id)))?;

                if period.status == PeriodStatus::Open {
                    return Err(PreconditionError::PeriodAlreadyOpen {
                        period_id: period_id.clone(),
                    }
                    .into());
                }

                diesel::update(periods::table.find(&period_id))
                    .set((
                        periods::status.eq(PeriodStatus::Open.as_str()),
                        periods::closed_at.eq(None::<String>),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                insert_entry(conn, &audit)?;

                Ok(Period {
                    status: PeriodStatus::Open,
                    closed_at: None,
                    ..period
                })
            })
            .await
    }
}
