//! Database models for funds.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use sinkwell_core::funds::Fund;

use crate::utils::parse_datetime_string_tolerant;

/// Database model for funds
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::funds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FundDB {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    pub target_cents: Option<i64>,
    pub balance_cents: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Changeset for fund metadata updates.
///
/// The balance column is deliberately absent: balances move only inside
/// ledger transactions, never through fund updates.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::funds)]
#[diesel(treat_none_as_null = true)]
pub struct FundChangesDB {
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    pub target_cents: Option<i64>,
    pub is_active: bool,
    pub updated_at: String,
}

// Conversion to domain models

impl From<FundDB> for Fund {
    fn from(db: FundDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            color: db.color,
            icon: db.icon,
            target_cents: db.target_cents,
            balance_cents: db.balance_cents,
            is_active: db.is_active,
            created_at: parse_datetime_string_tolerant(&db.created_at, "created_at"),
            updated_at: parse_datetime_string_tolerant(&db.updated_at, "updated_at"),
        }
    }
}

impl From<Fund> for FundDB {
    fn from(domain: Fund) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            description: domain.description,
            color: domain.color,
            icon: domain.icon,
            target_cents: domain.target_cents,
            balance_cents: domain.balance_cents,
            is_active: domain.is_active,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }
}

impl From<Fund> for FundChangesDB {
    fn from(domain: Fund) -> Self {
        Self {
            name: domain.name,
            description: domain.description,
            color: domain.color,
            icon: domain.icon,
            target_cents: domain.target_cents,
            is_active: domain.is_active,
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }
}
