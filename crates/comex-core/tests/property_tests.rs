//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Line totals: totalPrice is the rounded unit price times quantity
//! 2. Breakdown accounting: included entries add up to the unit price
//! 3. Proration: shares add back up to the prorated pool
//! 4. Monotonicity: EXW ≤ FOB ≤ CIF totals for the same cost set
//! 5. Idempotence: identical inputs serialize identically

use comex_core::money::round_money;
use comex_core::{
    calculate, Cost, CostType, Incoterm, LineItem, PerUnitOrTotal, PricingConfig, RoundingMode,
};
use comex_core::types::TariffInfo;
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_amount(max_cents: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_cents).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_tariff() -> impl Strategy<Value = Option<TariffInfo>> {
    prop::option::of((0..=35i64, arb_amount(5_000), prop::option::of(arb_amount(20_000))).prop_map(
        |(rate, fixed, min)| TariffInfo {
            ad_valorem_rate: Decimal::from(rate),
            fixed_export_duty: fixed,
            export_duty_min_amount: min,
            export_duty_max_amount: None,
        },
    ))
}

fn arb_item() -> impl Strategy<Value = LineItem> {
    ("[a-z]{3}", arb_amount(100_000), 1..=500i64, arb_tariff()).prop_map(
        |(id, price, qty, tariff)| LineItem {
            product_id: id.clone(),
            product_name: id,
            base_price: price,
            quantity: qty,
            tariff,
        },
    )
}

fn arb_cost_type() -> impl Strategy<Value = CostType> {
    prop_oneof![
        Just(CostType::Fixed),
        Just(CostType::Variable),
        Just(CostType::Freight),
        Just(CostType::Insurance),
    ]
}

fn arb_incoterm() -> impl Strategy<Value = Incoterm> {
    prop::sample::select(Incoterm::ALL.to_vec())
}

fn arb_cost() -> impl Strategy<Value = Cost> {
    (arb_cost_type(), arb_amount(200_000), any::<bool>(), any::<bool>(), arb_incoterm()).prop_map(
        |(cost_type, value, prorate, per_unit, incoterm)| {
            let mut cost = Cost::new("c", cost_type, value, incoterm);
            cost.prorate = prorate;
            if per_unit {
                cost = cost.per_unit();
            }
            cost
        },
    )
}

fn arb_budget() -> impl Strategy<Value = (Vec<LineItem>, Vec<Cost>)> {
    (
        prop::collection::vec(arb_item(), 1..6),
        prop::collection::vec(arb_cost(), 0..5),
    )
}

fn cent() -> Decimal {
    Decimal::new(1, 2)
}

// ── 1 & 2. Line Accounting ───────────────────────────────────────────

proptest! {
    /// totalPrice is exactly the reported unit price times quantity, rounded.
    #[test]
    fn total_price_is_unit_price_times_quantity(
        (items, costs) in arb_budget(),
        incoterm in arb_incoterm(),
    ) {
        let result = calculate(&items, &costs, incoterm, &PricingConfig::default()).unwrap();
        for line in &result.items {
            let expected = round_money(
                line.unit_price * Decimal::from(line.quantity),
                2,
                RoundingMode::HalfUp,
            );
            prop_assert_eq!(line.total_price, expected);
        }
    }

    /// Included breakdown entries account for the whole unit price.
    #[test]
    fn included_entries_add_up_to_unit_price(
        (items, costs) in arb_budget(),
        incoterm in arb_incoterm(),
    ) {
        let result = calculate(&items, &costs, incoterm, &PricingConfig::default()).unwrap();
        for line in &result.items {
            let included: Vec<_> = line.included().collect();
            let sum: Decimal = included.iter().map(|e| e.amount_per_unit).sum();
            let tolerance = cent() * Decimal::from(included.len() as i64);
            prop_assert!(
                (line.unit_price - sum).abs() <= tolerance,
                "unit {} vs entries {}", line.unit_price, sum
            );
        }
    }
}

// ── 3. Proration ─────────────────────────────────────────────────────

proptest! {
    /// Each prorated cost's shares add back up to its pool.
    #[test]
    fn prorated_shares_sum_to_pool(
        (items, costs) in arb_budget(),
        incoterm in arb_incoterm(),
    ) {
        let result = calculate(&items, &costs, incoterm, &PricingConfig::default()).unwrap();
        let subtotal: Decimal = items.iter().map(|i| i.line_subtotal()).sum();
        prop_assume!(!subtotal.is_zero());

        let total_qty: i64 = items.iter().map(|i| i.quantity).sum();
        let tolerance = cent() * Decimal::from(items.len() as i64);

        for (idx, cost) in costs.iter().enumerate() {
            if !cost.prorate {
                continue;
            }
            let pool = match cost.per_unit_or_total {
                PerUnitOrTotal::Total => cost.value,
                PerUnitOrTotal::PerUnit => cost.value * Decimal::from(total_qty),
            };
            // Entry 0 is the base price; costs follow in input order.
            let shares: Decimal = result
                .items
                .iter()
                .map(|line| line.breakdown[idx + 1].amount_total)
                .sum();
            prop_assert!((shares - pool).abs() <= tolerance, "shares {} vs pool {}", shares, pool);
        }
    }
}

// ── 4. Monotonicity ──────────────────────────────────────────────────

proptest! {
    /// Moving right along the Incoterm order never lowers the total.
    #[test]
    fn totals_grow_from_exw_to_cif((items, costs) in arb_budget()) {
        let config = PricingConfig::default();
        let exw = calculate(&items, &costs, Incoterm::Exw, &config).unwrap();
        let fob = calculate(&items, &costs, Incoterm::Fob, &config).unwrap();
        let cif = calculate(&items, &costs, Incoterm::Cif, &config).unwrap();

        prop_assert!(exw.total_amount <= fob.total_amount);
        prop_assert!(fob.total_amount <= cif.total_amount);
        prop_assert!(fob.total_fob() <= fob.total_cif());
    }
}

// ── 5. Idempotence ───────────────────────────────────────────────────

proptest! {
    /// Same inputs, same bytes.
    #[test]
    fn calculation_is_deterministic(
        (items, costs) in arb_budget(),
        incoterm in arb_incoterm(),
    ) {
        let config = PricingConfig::default();
        let render = || {
            let result = calculate(&items, &costs, incoterm, &config).unwrap();
            serde_json::to_string(&result).unwrap()
        };
        let first = render();
        let second = render();
        prop_assert_eq!(first, second);
    }
}
