//! The deposit-splitting engine.
//!
//! Pure computation: no clocks, no ids, no storage. Given the same deposit,
//! rules, and funds, it produces the same lines in the same order.

use std::collections::HashMap;

use crate::constants::BASIS_POINT_SCALE;
use crate::funds::Fund;

use super::allocation_model::{AllocationLine, AllocationResult, AllocationRule, RuleMode};

/// Splits a deposit across funds in three phases: FIXED, then PERCENT, then
/// PRIORITY, drawing every phase from one shared remainder.
///
/// Rules evaluate in ascending priority within each phase; ties keep the
/// order the rules arrive in. Inactive rules and rules pointing at funds
/// absent from `funds_by_id` are skipped, and whatever they would have
/// claimed stays in the remainder for later rules.
pub fn allocate(
    deposit_cents: i64,
    rules: &[AllocationRule],
    funds_by_id: &HashMap<String, Fund>,
) -> AllocationResult {
    // One stable sort up front fixes the evaluation order for every phase.
    let mut active: Vec<&AllocationRule> = rules.iter().filter(|r| r.is_active).collect();
    active.sort_by_key(|r| r.priority);

    let mut lines: Vec<AllocationLine> = Vec::new();
    let mut remaining = deposit_cents;

    // FIXED: each rule claims its flat amount, capped by what is left.
    for rule in active.iter().filter(|r| r.mode == RuleMode::Fixed) {
        let fund = match funds_by_id.get(&rule.fund_id) {
            Some(fund) => fund,
            None => continue,
        };
        let amount = rule.fixed_cents.unwrap_or(0).min(remaining);
        if amount <= 0 {
            continue;
        }
        lines.push(AllocationLine {
            fund_id: fund.id.clone(),
            fund_name: fund.name.clone(),
            amount_cents: amount,
            mode: RuleMode::Fixed,
            percent_bp: None,
        });
        remaining -= amount;
    }

    // PERCENT: shares are computed against the original deposit, not the
    // remainder, then capped by what is actually left. A cap on one rule
    // never enlarges another rule's share.
    for rule in active.iter().filter(|r| r.mode == RuleMode::Percent) {
        let fund = match funds_by_id.get(&rule.fund_id) {
            Some(fund) => fund,
            None => continue,
        };
        let bp = i64::from(rule.percent_bp.unwrap_or(0));
        let share = (deposit_cents as i128 * bp as i128 / BASIS_POINT_SCALE as i128) as i64;
        let amount = share.min(remaining);
        if amount <= 0 {
            continue;
        }
        lines.push(AllocationLine {
            fund_id: fund.id.clone(),
            fund_name: fund.name.clone(),
            amount_cents: amount,
            mode: RuleMode::Percent,
            percent_bp: rule.percent_bp,
        });
        remaining -= amount;
    }

    // PRIORITY: the first rule whose fund exists absorbs the entire
    // remainder. Later priority rules get nothing.
    if remaining > 0 {
        for rule in active.iter().filter(|r| r.mode == RuleMode::Priority) {
            let fund = match funds_by_id.get(&rule.fund_id) {
                Some(fund) => fund,
                None => continue,
            };
            lines.push(AllocationLine {
                fund_id: fund.id.clone(),
                fund_name: fund.name.clone(),
                amount_cents: remaining,
                mode: RuleMode::Priority,
                percent_bp: None,
            });
            remaining = 0;
            break;
        }
    }

    AllocationResult {
        total_allocated_cents: deposit_cents - remaining,
        remaining_cents: remaining,
        lines,
    }
}
