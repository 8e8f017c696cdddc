//! Database models for allocation rules and runs.

use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use sinkwell_core::allocation::{AllocationLine, AllocationRule, AllocationRun, RuleMode};

use crate::utils::{parse_datetime_string_tolerant, parse_json_string_tolerant, to_json_string_tolerant};

/// Database model for allocation rules
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::allocation_rules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRuleDB {
    pub id: String,
    pub fund_id: String,
    pub mode: String,
    pub percent_bp: Option<i32>,
    pub fixed_cents: Option<i64>,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Database model for allocation runs.
///
/// Runs are immutable once committed; there is no changeset type.
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::allocation_runs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AllocationRunDB {
    pub id: String,
    pub period_id: Option<String>,
    pub deposit_cents: i64,
    pub total_allocated_cents: i64,
    pub remaining_cents: i64,
    /// Allocation lines stored as a JSON array.
    pub lines: String,
    pub executed_at: String,
    pub hash: String,
}

// Conversion to domain models

impl From<AllocationRuleDB> for AllocationRule {
    fn from(db: AllocationRuleDB) -> Self {
        Self {
            id: db.id,
            fund_id: db.fund_id,
            mode: RuleMode::from_str(&db.mode).unwrap_or_else(|e| {
                log::error!("Failed to parse rule mode '{}': {}", db.mode, e);
                RuleMode::Fixed
            }),
            percent_bp: db.percent_bp,
            fixed_cents: db.fixed_cents,
            priority: db.priority,
            is_active: db.is_active,
            created_at: parse_datetime_string_tolerant(&db.created_at, "created_at"),
            updated_at: parse_datetime_string_tolerant(&db.updated_at, "updated_at"),
        }
    }
}

impl From<AllocationRule> for AllocationRuleDB {
    fn from(domain: AllocationRule) -> Self {
        Self {
            id: domain.id,
            fund_id: domain.fund_id,
            mode: domain.mode.as_str().to_string(),
            percent_bp: domain.percent_bp,
            fixed_cents: domain.fixed_cents,
            priority: domain.priority,
            is_active: domain.is_active,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }
}

impl From<AllocationRunDB> for AllocationRun {
    fn from(db: AllocationRunDB) -> Self {
        Self {
            id: db.id,
            period_id: db.period_id,
            deposit_cents: db.deposit_cents,
            total_allocated_cents: db.total_allocated_cents,
            remaining_cents: db.remaining_cents,
            lines: parse_json_string_tolerant::<Vec<AllocationLine>>(&db.lines, "lines"),
            executed_at: parse_datetime_string_tolerant(&db.executed_at, "executed_at"),
            hash: db.hash,
        }
    }
}

impl From<AllocationRun> for AllocationRunDB {
    fn from(domain: AllocationRun) -> Self {
        Self {
            id: domain.id,
            period_id: domain.period_id,
            deposit_cents: domain.deposit_cents,
            total_allocated_cents: domain.total_allocated_cents,
            remaining_cents: domain.remaining_cents,
            lines: to_json_string_tolerant(&domain.lines, "lines"),
            executed_at: domain.executed_at.to_rfc3339(),
            hash: domain.hash,
        }
    }
}
