//! Database models for periods.

use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use sinkwell_core::periods::{Period, PeriodStatus};

use crate::utils::parse_datetime_string_tolerant;

/// Database model for periods
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::periods)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PeriodDB {
    pub id: String,
    pub year: i32,
    pub month: i32,
    pub status: String,
    pub started_at: String,
    pub closed_at: Option<String>,
}

// Conversion to domain models

impl From<PeriodDB> for Period {
    fn from(db: PeriodDB) -> Self {
        Self {
            id: db.id,
            year: db.year,
            month: db.month as u32,
            status: PeriodStatus::from_str(&db.status).unwrap_or_else(|e| {
                log::error!("Failed to parse period status '{}': {}", db.status, e);
                PeriodStatus::Open
            }),
            started_at: parse_datetime_string_tolerant(&db.started_at, "started_at"),
            closed_at: db
                .closed_at
                .as_deref()
                .map(|value| parse_datetime_string_tolerant(value, "closed_at")),
        }
    }
}

impl From<Period> for PeriodDB {
    fn from(domain: Period) -> Self {
        Self {
            id: domain.id,
            year: domain.year,
            month: domain.month as i32,
            status: domain.status.as_str().to_string(),
            started_at: domain.started_at.to_rfc3339(),
            closed_at: domain.closed_at.map(|dt| dt.to_rfc3339()),
        }
    }
}
