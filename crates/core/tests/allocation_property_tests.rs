//! Property-based tests for the allocation engine.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use sinkwell_core::allocation::{allocate, compute_run_hash, AllocationRule, RuleMode};
use sinkwell_core::funds::Fund;

// =============================================================================
// Generators
// =============================================================================

/// The fixed fund pool: funds f0..f5 exist; rules may reference f0..f9, so
/// some rules point at funds that do not exist.
fn fund_pool() -> HashMap<String, Fund> {
    let now = Utc::now();
    (0..6)
        .map(|i| {
            let id = format!("f{}", i);
            (
                id.clone(),
                Fund {
                    id,
                    name: format!("Fund {}", i),
                    description: String::new(),
                    color: "#06b6d4".to_string(),
                    icon: "💰".to_string(),
                    target_cents: None,
                    balance_cents: 0,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                },
            )
        })
        .collect()
}

/// Generates a random allocation rule of any mode, pointing at a fund that
/// may or may not exist in the pool.
fn arb_rule() -> impl Strategy<Value = AllocationRule> {
    (
        0usize..3,                    // mode selector
        0usize..10,                   // fund index, 6..9 are missing funds
        0i64..20_000,                 // fixed cents
        0i32..=10_000,                // percent bp
        -5i32..50,                    // priority
        proptest::bool::weighted(0.85), // is_active
    )
        .prop_map(|(mode_ix, fund_ix, fixed, bp, priority, is_active)| {
            let now = Utc::now();
            let (mode, percent_bp, fixed_cents) = match mode_ix {
                0 => (RuleMode::Fixed, None, Some(fixed)),
                1 => (RuleMode::Percent, Some(bp), None),
                _ => (RuleMode::Priority, None, None),
            };
            AllocationRule {
                id: format!("rule-{}-{}", mode_ix, fund_ix),
                fund_id: format!("f{}", fund_ix),
                mode,
                percent_bp,
                fixed_cents,
                priority,
                is_active,
                created_at: now,
                updated_at: now,
            }
        })
}

fn arb_rules(max_count: usize) -> impl Strategy<Value = Vec<AllocationRule>> {
    proptest::collection::vec(arb_rule(), 0..=max_count)
}

fn phase_rank(mode: RuleMode) -> u8 {
    match mode {
        RuleMode::Fixed => 0,
        RuleMode::Percent => 1,
        RuleMode::Priority => 2,
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: allocation conservation**
    ///
    /// Every cent of the deposit is either placed on a line or reported as
    /// remaining; no money appears or disappears.
    #[test]
    fn prop_allocation_conserves_the_deposit(
        deposit in 1i64..1_000_000,
        rules in arb_rules(12),
    ) {
        let funds = fund_pool();
        let result = allocate(deposit, &rules, &funds);

        let placed: i64 = result.lines.iter().map(|l| l.amount_cents).sum();
        prop_assert_eq!(placed, result.total_allocated_cents);
        prop_assert_eq!(
            result.total_allocated_cents + result.remaining_cents,
            deposit,
            "placed + remaining must equal the deposit"
        );
        prop_assert!(result.remaining_cents >= 0);
        prop_assert!(result.lines.iter().all(|l| l.amount_cents > 0));
    }

    /// **Property: allocation determinism**
    ///
    /// Identical inputs produce identical lines in identical order.
    #[test]
    fn prop_allocation_is_deterministic(
        deposit in 1i64..1_000_000,
        rules in arb_rules(12),
    ) {
        let funds = fund_pool();

        let first = allocate(deposit, &rules, &funds);
        let second = allocate(deposit, &rules, &funds);

        prop_assert_eq!(first, second);
    }

    /// **Property: lines only reference existing funds**
    #[test]
    fn prop_lines_only_reference_existing_funds(
        deposit in 1i64..1_000_000,
        rules in arb_rules(12),
    ) {
        let funds = fund_pool();
        let result = allocate(deposit, &rules, &funds);

        prop_assert!(result.lines.iter().all(|l| funds.contains_key(&l.fund_id)));
    }

    /// **Property: lines come out in phase order**
    ///
    /// All FIXED lines precede all PERCENT lines, which precede the single
    /// PRIORITY line if one exists.
    #[test]
    fn prop_lines_are_ordered_by_phase(
        deposit in 1i64..1_000_000,
        rules in arb_rules(12),
    ) {
        let funds = fund_pool();
        let result = allocate(deposit, &rules, &funds);

        let ranks: Vec<u8> = result.lines.iter().map(|l| phase_rank(l.mode)).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    /// **Property: percent shares are computed against the original deposit**
    ///
    /// A lone PERCENT rule receives exactly floor(deposit * bp / 10000).
    #[test]
    fn prop_percent_share_is_floor_of_original_deposit(
        deposit in 1i64..1_000_000,
        bp in 0i32..=10_000,
    ) {
        let funds = fund_pool();
        let now = Utc::now();
        let rule = AllocationRule {
            id: "only-rule".to_string(),
            fund_id: "f0".to_string(),
            mode: RuleMode::Percent,
            percent_bp: Some(bp),
            fixed_cents: None,
            priority: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let result = allocate(deposit, &[rule], &funds);
        let expected = (deposit as i128 * bp as i128 / 10_000) as i64;

        if expected == 0 {
            prop_assert!(result.lines.is_empty());
        } else {
            prop_assert_eq!(result.lines.len(), 1);
            prop_assert_eq!(result.lines[0].amount_cents, expected);
        }
    }

    /// **Property: priority exclusivity**
    ///
    /// Whenever money is left after the FIXED and PERCENT phases and at
    /// least one active PRIORITY rule points at an existing fund, exactly
    /// one PRIORITY line absorbs all of it; the winner is the eligible rule
    /// with the lowest (priority, arrival) ordering.
    #[test]
    fn prop_priority_phase_funds_exactly_one_winner(
        deposit in 1i64..1_000_000,
        rules in arb_rules(12),
    ) {
        let funds = fund_pool();
        let result = allocate(deposit, &rules, &funds);

        let non_priority_total: i64 = result
            .lines
            .iter()
            .filter(|l| l.mode != RuleMode::Priority)
            .map(|l| l.amount_cents)
            .sum();
        let leftover = deposit - non_priority_total;

        let eligible: Vec<(usize, &AllocationRule)> = rules
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.is_active && r.mode == RuleMode::Priority && funds.contains_key(&r.fund_id)
            })
            .collect();

        let priority_lines: Vec<_> = result
            .lines
            .iter()
            .filter(|l| l.mode == RuleMode::Priority)
            .collect();

        if !eligible.is_empty() && leftover > 0 {
            prop_assert_eq!(priority_lines.len(), 1);
            prop_assert_eq!(priority_lines[0].amount_cents, leftover);
            prop_assert_eq!(result.remaining_cents, 0);

            let winner = eligible
                .iter()
                .min_by_key(|(arrival, r)| (r.priority, *arrival))
                .map(|(_, r)| r.fund_id.clone())
                .unwrap();
            prop_assert_eq!(&priority_lines[0].fund_id, &winner);
        } else {
            prop_assert!(priority_lines.is_empty());
        }
    }

    /// **Property: run hashes track semantic content**
    #[test]
    fn prop_run_hash_is_stable_and_deposit_sensitive(
        deposit in 1i64..1_000_000,
        rules in arb_rules(8),
    ) {
        let funds = fund_pool();
        let executed_at = Utc::now();
        let result = allocate(deposit, &rules, &funds);

        let a = compute_run_hash(deposit, Some("p1"), &executed_at, &result.lines);
        let b = compute_run_hash(deposit, Some("p1"), &executed_at, &result.lines);
        let c = compute_run_hash(deposit + 1, Some("p1"), &executed_at, &result.lines);

        prop_assert_eq!(&a, &b);
        prop_assert_ne!(&a, &c);
    }
}
