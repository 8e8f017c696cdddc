//! Period domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::allocation::AllocationRun;

/// Lifecycle state of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    Open,
    Closed,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::Open => "OPEN",
            PeriodStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for PeriodStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PeriodStatus::Open),
            "CLOSED" => Ok(PeriodStatus::Closed),
            _ => Err(format!("Unknown period status: {}", s)),
        }
    }
}

/// A budgeting month. At most one period exists per (year, month) pair.
///
/// Fund balances are never reset when a period starts or closes; unspent
/// money carries forward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: String,
    pub year: i32,
    pub month: u32,
    pub status: PeriodStatus,
    pub started_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Input model for starting the current month's period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStartRequest {
    /// When set with a positive deposit, an allocation run is committed in
    /// the same unit as the period row.
    #[serde(default)]
    pub auto_allocate: bool,
    pub deposit_cents: Option<i64>,
}

/// Outcome of starting a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStartResult {
    pub period: Period,
    /// Present when the start triggered an allocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_run: Option<AllocationRun>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in [PeriodStatus::Open, PeriodStatus::Closed] {
            assert_eq!(PeriodStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(PeriodStatus::from_str("ARCHIVED").is_err());
    }

    #[test]
    fn test_start_request_defaults() {
        let request: PeriodStartRequest = serde_json::from_str("{}").unwrap();
        assert!(!request.auto_allocate);
        assert_eq!(request.deposit_cents, None);
    }

    #[test]
    fn test_period_serializes_camel_case() {
        let period = Period {
            id: "p1".to_string(),
            year: 2026,
            month: 3,
            status: PeriodStatus::Open,
            started_at: Utc::now(),
            closed_at: None,
        };

        let value = serde_json::to_value(&period).unwrap();
        assert_eq!(value["status"], "OPEN");
        assert!(value["startedAt"].is_string());
        assert!(value["closedAt"].is_null());
    }
}
