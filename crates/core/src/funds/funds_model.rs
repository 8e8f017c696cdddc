//! Fund domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FUND_COLOR, DEFAULT_FUND_ICON};
use crate::errors::{Error, Result, ValidationError};

/// Domain model representing a sinking fund.
///
/// `balance_cents` is a materialized view over the ledger: at any instant it
/// equals the signed sum of all transactions referencing this fund. Only the
/// allocation and transfer executors (and ordinary transaction creation) may
/// move it, and always in the same atomic unit as the ledger rows backing
/// the change. Balances may go negative through EXPENSE overspend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    /// Optional savings goal, in cents.
    pub target_cents: Option<i64>,
    /// Signed balance in cents.
    pub balance_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a new fund.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFund {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub target_cents: Option<i64>,
    pub is_active: Option<bool>,
}

impl NewFund {
    /// Validates the new fund data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if let Some(target) = self.target_cents {
            if target < 0 {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Target amount cannot be negative".to_string(),
                )));
            }
        }
        Ok(())
    }

    /// Builds the fund row, applying creation defaults.
    ///
    /// The balance always starts at zero; money only enters through ledger
    /// transactions.
    pub fn into_fund(self, id: String, now: DateTime<Utc>) -> Fund {
        Fund {
            id,
            name: self.name.trim().to_string(),
            description: self.description.unwrap_or_default(),
            color: self.color.unwrap_or_else(|| DEFAULT_FUND_COLOR.to_string()),
            icon: self.icon.unwrap_or_else(|| DEFAULT_FUND_ICON.to_string()),
            target_cents: self.target_cents,
            balance_cents: 0,
            is_active: self.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Patch value object for updating a fund.
///
/// Enumerates exactly the fields callers may change; `None` leaves a field
/// untouched. The balance is deliberately absent; it belongs to the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub target_cents: Option<i64>,
    pub is_active: Option<bool>,
}

impl FundUpdate {
    /// Validates the patch data.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Fund name cannot be empty".to_string(),
                )));
            }
        }
        if let Some(target) = self.target_cents {
            if target < 0 {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Target amount cannot be negative".to_string(),
                )));
            }
        }
        Ok(())
    }

    /// Merges the patch into an existing fund in a single pass.
    pub fn apply_to(self, mut fund: Fund, now: DateTime<Utc>) -> Fund {
        if let Some(name) = self.name {
            fund.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            fund.description = description;
        }
        if let Some(color) = self.color {
            fund.color = color;
        }
        if let Some(icon) = self.icon {
            fund.icon = icon;
        }
        if let Some(target) = self.target_cents {
            fund.target_cents = Some(target);
        }
        if let Some(is_active) = self.is_active {
            fund.is_active = is_active;
        }
        fund.updated_at = now;
        fund
    }
}
