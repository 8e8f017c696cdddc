use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use sinkwell_core::allocation::{
    AllocationCommit, AllocationRule, AllocationRuleRepositoryTrait, AllocationRun,
    AllocationRunRepositoryTrait,
};
use sinkwell_core::audit::AuditLogEntry;
use sinkwell_core::{Error, Result};

use super::model::{AllocationRuleDB, AllocationRunDB};
use crate::audit::insert_entry;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::funds::apply_balance_delta;
use crate::schema::{allocation_rules, allocation_runs};
use crate::transactions::insert_row;

/// Persists one allocation commit inside an open transaction: the run row,
/// every ALLOCATION ledger row with its balance move, and the audit entry.
///
/// A missing fund fails the balance move with NotFound, rolling back the
/// entire commit.
pub(crate) fn insert_commit(conn: &mut SqliteConnection, commit: &AllocationCommit) -> Result<()> {
    let run_db = AllocationRunDB::from(commit.run.clone());
    diesel::insert_into(allocation_runs::table)
        .values(&run_db)
        .execute(conn)
        .map_err(StorageError::from)?;

    for transaction in &commit.transactions {
        apply_balance_delta(conn, &transaction.fund_id, transaction.signed_amount())?;
        insert_row(conn, transaction)?;
    }

    insert_entry(conn, &commit.audit)?;
    Ok(())
}

pub struct AllocationRuleRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AllocationRuleRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        AllocationRuleRepository { pool, writer }
    }
}

#[async_trait]
impl AllocationRuleRepositoryTrait for AllocationRuleRepository {
    fn get_by_id(&self, rule_id: &str) -> Result<AllocationRule> {
        let mut conn = get_connection(&self.pool)?;
        let rule_db = allocation_rules::table
            .find(rule_id)
            .select(AllocationRuleDB::as_select())
            .first::<AllocationRuleDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::NotFound(format!("Allocation rule not found: {}", rule_id)))?;
        Ok(AllocationRule::from(rule_db))
    }

    fn list(&self, active_only: bool) -> Result<Vec<AllocationRule>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = allocation_rules::table
            .select(AllocationRuleDB::as_select())
            .into_boxed();
        if active_only {
            query = query.filter(allocation_rules::is_active.eq(true));
        }

        let rules_db = query
            .order(allocation_rules::created_at.asc())
            .load::<AllocationRuleDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rules_db.into_iter().map(AllocationRule::from).collect())
    }

    async fn insert(&self, rule: AllocationRule, audit: AuditLogEntry) -> Result<AllocationRule> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AllocationRule> {
                let rule_db = AllocationRuleDB::from(rule.clone());
                diesel::insert_into(allocation_rules::table)
                    .values(&rule_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                insert_entry(conn, &audit)?;
                Ok(rule)
            })
            .await
    }

    async fn update(&self, rule: AllocationRule, audit: AuditLogEntry) -> Result<AllocationRule> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AllocationRule> {
                let rule_db = AllocationRuleDB::from(rule.clone());
                let affected = diesel::update(allocation_rules::table.find(&rule.id))
                    .set(&rule_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!(
                        "Allocation rule not found: {}",
                        rule.id
                    )));
                }
                insert_entry(conn, &audit)?;
                Ok(rule)
            })
            .await
    }

    async fn delete(&self, rule_id: &str, audit: AuditLogEntry) -> Result<()> {
        let rule_id = rule_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::delete(allocation_rules::table.find(&rule_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!(
                        "Allocation rule not found: {}",
                        rule_id
                    )));
                }
                insert_entry(conn, &audit)?;
                Ok(())
            })
            .await
    }
}

pub struct AllocationRunRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AllocationRunRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        AllocationRunRepository { pool, writer }
    }
}

#[async_trait]
impl AllocationRunRepositoryTrait for AllocationRunRepository {
    fn get_by_id(&self, run_id: &str) -> Result<AllocationRun> {
        let mut conn = get_connection(&self.pool)?;
        let run_db = allocation_runs::table
            .find(run_id)
            .select(AllocationRunDB::as_select())
            .first::<AllocationRunDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::NotFound(format!("Allocation run not found: {}", run_id)))?;
        Ok(AllocationRun::from(run_db))
    }

    fn list(&self) -> Result<Vec<AllocationRun>> {
        let mut conn = get_connection(&self.pool)?;
        let runs_db = allocation_runs::table
            .select(AllocationRunDB::as_select())
            .order(allocation_runs::executed_at.desc())
            .load::<AllocationRunDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(runs_db.into_iter().map(AllocationRun::from).collect())
    }

    async fn commit_run(&self, commit: AllocationCommit) -> Result<AllocationRun> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AllocationRun> {
                insert_commit(conn, &commit)?;
                Ok(commit.run)
            })
            .await
    }
}
