//! Allocation domain models: rules, engine output, and run records.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::audit::AuditLogEntry;
use crate::constants::BASIS_POINT_SCALE;
use crate::errors::{Error, Result, ValidationError};
use crate::transactions::Transaction;

/// How a rule claims money from a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleMode {
    /// Claims a flat number of cents.
    Fixed,
    /// Claims a share of the original deposit, in basis points.
    Percent,
    /// Absorbs whatever is left after the other phases.
    Priority,
}

impl RuleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleMode::Fixed => "FIXED",
            RuleMode::Percent => "PERCENT",
            RuleMode::Priority => "PRIORITY",
        }
    }
}

impl FromStr for RuleMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "FIXED" => Ok(RuleMode::Fixed),
            "PERCENT" => Ok(RuleMode::Percent),
            "PRIORITY" => Ok(RuleMode::Priority),
            _ => Err(format!("Unknown rule mode: {}", s)),
        }
    }
}

/// Domain model representing one allocation rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRule {
    pub id: String,
    pub fund_id: String,
    pub mode: RuleMode,
    /// Basis points of the deposit; populated iff mode is PERCENT.
    pub percent_bp: Option<i32>,
    /// Flat claim in cents; populated iff mode is FIXED.
    pub fixed_cents: Option<i64>,
    /// Lower values evaluate first; ties keep creation order.
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AllocationRule {
    /// Checks that the amount fields match the mode: FIXED carries only
    /// `fixed_cents`, PERCENT only `percent_bp`, PRIORITY neither.
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            RuleMode::Fixed => {
                let fixed = self.fixed_cents.ok_or_else(|| {
                    Error::Validation(ValidationError::MissingField("fixedCents".to_string()))
                })?;
                if fixed < 0 {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "Fixed amount cannot be negative".to_string(),
                    )));
                }
                if self.percent_bp.is_some() {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "A FIXED rule cannot carry percentBp".to_string(),
                    )));
                }
            }
            RuleMode::Percent => {
                let bp = self.percent_bp.ok_or_else(|| {
                    Error::Validation(ValidationError::MissingField("percentBp".to_string()))
                })?;
                if !(0..=BASIS_POINT_SCALE as i32).contains(&bp) {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "percentBp must be between 0 and 10000".to_string(),
                    )));
                }
                if self.fixed_cents.is_some() {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "A PERCENT rule cannot carry fixedCents".to_string(),
                    )));
                }
            }
            RuleMode::Priority => {
                if self.percent_bp.is_some() || self.fixed_cents.is_some() {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "A PRIORITY rule carries no amount fields".to_string(),
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Input model for creating a new allocation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAllocationRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub fund_id: String,
    pub mode: RuleMode,
    pub percent_bp: Option<i32>,
    pub fixed_cents: Option<i64>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

impl NewAllocationRule {
    /// Builds the rule row, applying creation defaults, and validates it.
    pub fn into_rule(self, id: String, now: DateTime<Utc>) -> Result<AllocationRule> {
        if self.fund_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "fundId".to_string(),
            )));
        }
        let rule = AllocationRule {
            id,
            fund_id: self.fund_id,
            mode: self.mode,
            percent_bp: self.percent_bp,
            fixed_cents: self.fixed_cents,
            priority: self.priority.unwrap_or(0),
            is_active: self.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        rule.validate()?;
        Ok(rule)
    }
}

/// Patch value object for updating an allocation rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRuleUpdate {
    pub fund_id: Option<String>,
    pub mode: Option<RuleMode>,
    pub percent_bp: Option<i32>,
    pub fixed_cents: Option<i64>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
}

impl AllocationRuleUpdate {
    /// Merges the patch into an existing rule and re-validates the result.
    ///
    /// When the mode changes, amount fields belonging to the old mode are
    /// dropped rather than left to fail validation.
    pub fn apply_to(self, mut rule: AllocationRule, now: DateTime<Utc>) -> Result<AllocationRule> {
        if let Some(fund_id) = self.fund_id {
            rule.fund_id = fund_id;
        }
        if let Some(mode) = self.mode {
            rule.mode = mode;
        }
        if let Some(bp) = self.percent_bp {
            rule.percent_bp = Some(bp);
        }
        if let Some(fixed) = self.fixed_cents {
            rule.fixed_cents = Some(fixed);
        }
        match rule.mode {
            RuleMode::Fixed => rule.percent_bp = None,
            RuleMode::Percent => rule.fixed_cents = None,
            RuleMode::Priority => {
                rule.percent_bp = None;
                rule.fixed_cents = None;
            }
        }
        if let Some(priority) = self.priority {
            rule.priority = priority;
        }
        if let Some(is_active) = self.is_active {
            rule.is_active = is_active;
        }
        rule.updated_at = now;
        rule.validate()?;
        Ok(rule)
    }
}

/// One fund's share of a deposit, as computed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationLine {
    pub fund_id: String,
    pub fund_name: String,
    pub amount_cents: i64,
    pub mode: RuleMode,
    /// Present only on PERCENT-derived lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_bp: Option<i32>,
}

/// Engine output: ordered lines plus what could not be placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    pub lines: Vec<AllocationLine>,
    pub total_allocated_cents: i64,
    /// Unplaced money. Stays in the caller's hands; never silently dropped.
    pub remaining_cents: i64,
}

/// Preview of an execution: the committed path would produce exactly this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPreview {
    pub deposit_cents: i64,
    pub lines: Vec<AllocationLine>,
    pub total_allocated_cents: i64,
    pub remaining_cents: i64,
}

/// Immutable record of a deposit having been split across funds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRun {
    pub id: String,
    pub period_id: Option<String>,
    pub deposit_cents: i64,
    pub total_allocated_cents: i64,
    pub remaining_cents: i64,
    pub lines: Vec<AllocationLine>,
    pub executed_at: DateTime<Utc>,
    /// Opaque fingerprint of the run's semantic content.
    pub hash: String,
}

/// Everything one allocation execution persists: the run record, its
/// ALLOCATION transactions, and the audit entry, committed as one unit.
#[derive(Debug, Clone)]
pub struct AllocationCommit {
    pub run: AllocationRun,
    pub transactions: Vec<Transaction>,
    pub audit: AuditLogEntry,
}

/// Computes a stable fingerprint for an allocation run.
///
/// SHA-256 over the run's semantic content: deposit, period reference,
/// execution timestamp, and each line's fund/amount/mode.
pub fn compute_run_hash(
    deposit_cents: i64,
    period_id: Option<&str>,
    executed_at: &DateTime<Utc>,
    lines: &[AllocationLine],
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(deposit_cents.to_string().as_bytes());
    hasher.update(b"|");
    if let Some(pid) = period_id {
        hasher.update(pid.as_bytes());
    }
    hasher.update(b"|");
    hasher.update(executed_at.to_rfc3339().as_bytes());

    for line in lines {
        hasher.update(b"|");
        hasher.update(line.fund_id.as_bytes());
        hasher.update(b":");
        hasher.update(line.amount_cents.to_string().as_bytes());
        hasher.update(b":");
        hasher.update(line.mode.as_str().as_bytes());
    }

    hex::encode(hasher.finalize())
}
