use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use sinkwell_core::audit::{
    AuditLogEntry, AuditLogFilter, AuditLogResponse, AuditLogResponseMeta, AuditRepositoryTrait,
};
use sinkwell_core::Result;

use super::model::AuditLogEntryDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::audit_logs;

/// Appends an audit entry inside an open transaction.
///
/// Every mutating repository calls this so the entry lands in the same
/// atomic unit as the mutation it describes.
pub(crate) fn insert_entry(conn: &mut SqliteConnection, entry: &AuditLogEntry) -> Result<()> {
    let entry_db = AuditLogEntryDB::from(entry.clone());
    diesel::insert_into(audit_logs::table)
        .values(&entry_db)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

pub struct AuditRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AuditRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        AuditRepository { pool, writer }
    }
}

#[async_trait]
impl AuditRepositoryTrait for AuditRepository {
    fn list(&self, filter: &AuditLogFilter) -> Result<AuditLogResponse> {
        let mut conn = get_connection(&self.pool)?;

        // Boxed queries cannot be cloned, so the filtered base is built twice:
        // once for the count, once for the page itself.
        let build_query = || {
            let mut query = audit_logs::table.into_boxed();
            if let Some(ref action) = filter.action {
                query = query.filter(audit_logs::action.eq(action.clone()));
            }
            if let Some(start) = filter.start_date {
                query = query.filter(audit_logs::created_at.ge(start.to_rfc3339()));
            }
            if let Some(end) = filter.end_date {
                query = query.filter(audit_logs::created_at.le(end.to_rfc3339()));
            }
            query
        };

        let total_count: i64 = build_query()
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;

        let page = filter.page();
        let limit = filter.limit();

        let entries_db = build_query()
            .select(AuditLogEntryDB::as_select())
            .order(audit_logs::created_at.desc())
            .limit(limit)
            .offset((page - 1) * limit)
            .load::<AuditLogEntryDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(AuditLogResponse {
            data: entries_db.into_iter().map(AuditLogEntry::from).collect(),
            meta: AuditLogResponseMeta {
                page,
                limit,
                total_count,
                total_pages: (total_count + limit - 1) / limit,
            },
        })
    }

    async fn append(&self, entry: AuditLogEntry) -> Result<AuditLogEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AuditLogEntry> {
                insert_entry(conn, &entry)?;
                Ok(entry)
            })
            .await
    }
}
