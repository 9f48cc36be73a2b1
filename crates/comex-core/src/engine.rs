//! # Cost Allocation Engine
//!
//! Turns `(items, costs, incoterm, config)` into a priced breakdown.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate ──► VAT back-out ──► subtotal                                 │
//! │                                   │                                     │
//! │        ┌──────────────────────────┤                                     │
//! │        ▼                          ▼                                     │
//! │  costs (input order)         Incoterm Policy                            │
//! │  ├── prorate=true  ──► share by line value  ─┐                          │
//! │  └── prorate=false ──► spread by units      ─┼─► per-line entries       │
//! │                                              │                          │
//! │  export duty (DEX) ──► clamp(min, max) ──────┘   always included        │
//! │                                                                         │
//! │  per line: unitPrice = base + Σ included per-unit amounts               │
//! │  totals:   FOB = subtotal + local + DEX ; CIF = FOB + freight + ins     │
//! │                                                                         │
//! │  ROUNDING happens once, in `finish`, never during accumulation          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Excluded costs stay in the breakdown with `includedInIncoterm = false`
//! so a quote shows what the buyer will pay on their own.

use rust_decimal::Decimal;
use tracing::{debug, debug_span};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::incoterm::{is_cost_included, Incoterm, TotalAggregate};
use crate::money::{back_out_vat, percent_of, proportional_share, round_money, safe_div};
use crate::types::{
    BreakdownType, CalculationMetadata, CalculationResult, Cost, CostBreakdownLine, DutyBasis,
    LineItem, LinePricingResult, PerUnitOrTotal, PricingConfig, TariffInfo,
};
use crate::validation::validate_calculation;

/// Label of the base price entry.
pub const PRODUCT_LABEL: &str = "Base Price";

/// Label of the export duty entry.
pub const DUTY_LABEL: &str = "Export Duty (DEX)";

/// Appended to freight or insurance entries that are priced into lines while
/// the quote's total stops at FOB.
pub const OUTSIDE_TOTAL_NOTE: &str = "excluded from totalAmount";

// =============================================================================
// Internal Accumulators
// =============================================================================

/// Which aggregate an entry feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Product,
    Local,
    FreightInsurance,
    Duty,
}

/// A breakdown entry at full precision.
#[derive(Debug)]
struct Entry {
    label: String,
    kind: BreakdownType,
    bucket: Bucket,
    per_unit: Decimal,
    total: Decimal,
    included: bool,
    description: Option<String>,
}

/// A line being priced.
#[derive(Debug)]
struct WorkLine<'a> {
    item: &'a LineItem,
    quantity: Decimal,
    subtotal: Decimal,
    entries: Vec<Entry>,
}

impl WorkLine<'_> {
    fn included_total(&self, bucket: Bucket) -> Option<Decimal> {
        checked_sum(
            self.entries
                .iter()
                .filter(|e| e.included && e.bucket == bucket)
                .map(|e| e.total),
        )
    }

    fn unit_price(&self) -> Option<Decimal> {
        checked_sum(self.entries.iter().filter(|e| e.included).map(|e| e.per_unit))
    }
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

/// Overflow past the decimal range, reported against the field that caused it.
fn too_large(field: impl Into<String>) -> CoreError {
    ValidationError::TooLarge {
        field: field.into(),
    }
    .into()
}

// =============================================================================
// Public API
// =============================================================================

/// Prices a budget.
///
/// ## Errors
/// - `CoreError::Validation` for empty items, non-positive quantities,
///   negative amounts, inverted tariff bounds or out-of-range config.
/// - `ValidationError::TooLarge` when an amount, multiplied out, leaves the
///   decimal range. The field names the input that overflowed.
///
/// Nothing is computed when validation fails.
///
/// ## Example
/// ```rust
/// use comex_core::{calculate, Cost, CostType, Incoterm, LineItem, PricingConfig};
/// use rust_decimal::Decimal;
///
/// let items = vec![LineItem::new("p1", "Malbec", Decimal::new(10, 0), 100)];
/// let costs = vec![
///     Cost::new("c1", CostType::Fixed, Decimal::new(200, 0), Incoterm::Fob)
///         .named("Customs Broker")
///         .prorated(),
/// ];
///
/// let result = calculate(&items, &costs, Incoterm::Fob, &PricingConfig::default()).unwrap();
/// assert_eq!(result.items[0].unit_price.to_string(), "12.00");
/// assert_eq!(result.total_amount.to_string(), "1200.00");
/// ```
pub fn calculate(
    items: &[LineItem],
    costs: &[Cost],
    incoterm: Incoterm,
    config: &PricingConfig,
) -> CoreResult<CalculationResult> {
    let span = debug_span!(
        "calculate",
        incoterm = %incoterm,
        items = items.len(),
        costs = costs.len()
    );
    let _enter = span.enter();

    validate_calculation(items, costs, config)?;

    // Steps 1-2: VAT back-out, then subtotal on VAT-exclusive prices
    let mut lines = items
        .iter()
        .enumerate()
        .map(|(index, item)| open_line(index, item, config))
        .collect::<CoreResult<Vec<WorkLine<'_>>>>()?;
    let subtotal = checked_sum(lines.iter().map(|l| l.subtotal))
        .ok_or_else(|| too_large("subtotalProducts"))?;
    let total_quantity = checked_sum(lines.iter().map(|l| l.quantity))
        .ok_or_else(|| too_large("items"))?;

    // Steps 4-6: costs in input order
    for (index, cost) in costs.iter().enumerate() {
        let field = format!("costs[{}].value", index);
        let included = is_cost_included(cost.incoterm(), incoterm);
        let target = Target {
            incoterm,
            included,
            field: &field,
        };
        if cost.prorate {
            apply_prorated(&mut lines, cost, target, subtotal, total_quantity)?;
        } else {
            apply_spread(&mut lines, cost, target, total_quantity)?;
        }
    }

    // Step 3: duty last, so the gross-up basis can see the line's local costs
    for (index, line) in lines.iter_mut().enumerate() {
        if let Some(ref tariff) = line.item.tariff {
            let entry = duty_entry(line, tariff, config.duty_basis)
                .ok_or_else(|| too_large(format!("items[{}].tariff", index)))?;
            line.entries.push(entry);
        }
    }

    let result = finish(lines, costs, incoterm, subtotal, config)?;
    debug!(
        subtotal = %result.subtotal_products,
        total_fob = %result.total_fob(),
        total_cif = %result.total_cif(),
        total_amount = %result.total_amount,
        "Budget calculated"
    );
    Ok(result)
}

/// Splits `pool` across `weights` proportionally.
///
/// Shares carry full precision, so they sum back to `pool` up to the last
/// of 28 digits. A zero total weight yields all-zero shares.
///
/// ## Example
/// ```rust
/// use comex_core::engine::prorate;
/// use rust_decimal::Decimal;
///
/// let shares = prorate(Decimal::new(300, 0), &[Decimal::new(1000, 0), Decimal::new(1000, 0)]);
/// assert_eq!(shares, vec![Decimal::new(150, 0), Decimal::new(150, 0)]);
/// ```
pub fn prorate(pool: Decimal, weights: &[Decimal]) -> Vec<Decimal> {
    let whole = checked_sum(weights.iter().copied()).unwrap_or(Decimal::MAX);
    weights
        .iter()
        .map(|&part| proportional_share(pool, part, whole))
        .collect()
}

// =============================================================================
// Steps
// =============================================================================

/// How one cost lands on the lines.
#[derive(Debug, Clone, Copy)]
struct Target<'f> {
    incoterm: Incoterm,
    included: bool,
    field: &'f str,
}

impl Target<'_> {
    /// Freight or insurance priced into a term whose total stops at FOB.
    fn outside_total(&self, cost: &Cost) -> bool {
        self.included
            && cost.cost_type.is_freight_or_insurance()
            && !self.incoterm.includes_freight_and_insurance()
    }

    fn describe(&self, cost: &Cost, description: String) -> Option<String> {
        if self.outside_total(cost) {
            Some(format!("{}, {}", description, OUTSIDE_TOTAL_NOTE))
        } else {
            Some(description)
        }
    }
}

fn open_line<'a>(
    index: usize,
    item: &'a LineItem,
    config: &PricingConfig,
) -> CoreResult<WorkLine<'a>> {
    let base_price = match (config.adjust_for_vat, config.vat_rate) {
        (true, Some(rate)) => back_out_vat(item.base_price, rate),
        _ => item.base_price,
    };
    let quantity = Decimal::from(item.quantity);
    let subtotal = base_price
        .checked_mul(quantity)
        .ok_or_else(|| too_large(format!("items[{}].basePrice", index)))?;

    let description = if base_price != item.base_price {
        Some(format!("VAT-exclusive, from {}", item.base_price))
    } else {
        None
    };

    Ok(WorkLine {
        item,
        quantity,
        subtotal,
        entries: vec![Entry {
            label: PRODUCT_LABEL.to_string(),
            kind: BreakdownType::Product,
            bucket: Bucket::Product,
            per_unit: base_price,
            total: subtotal,
            included: true,
            description,
        }],
    })
}

fn bucket_for(cost: &Cost) -> Bucket {
    if cost.cost_type.is_freight_or_insurance() {
        Bucket::FreightInsurance
    } else {
        Bucket::Local
    }
}

/// Distributes the cost pool by each line's share of the subtotal.
fn apply_prorated(
    lines: &mut [WorkLine<'_>],
    cost: &Cost,
    target: Target<'_>,
    subtotal: Decimal,
    total_quantity: Decimal,
) -> CoreResult<()> {
    let pool = match cost.per_unit_or_total {
        PerUnitOrTotal::Total => cost.value,
        PerUnitOrTotal::PerUnit => cost
            .value
            .checked_mul(total_quantity)
            .ok_or_else(|| too_large(target.field))?,
    };

    let weights: Vec<Decimal> = lines.iter().map(|l| l.subtotal).collect();
    let shares = prorate(pool, &weights);

    for (line, share) in lines.iter_mut().zip(shares) {
        let ratio = safe_div(line.subtotal, subtotal);
        let description = format!(
            "{}% of {} by line value",
            (ratio * Decimal::ONE_HUNDRED).round_dp(2).normalize(),
            pool.normalize()
        );
        line.entries.push(Entry {
            label: cost.label().to_string(),
            kind: BreakdownType::Prorated,
            bucket: bucket_for(cost),
            per_unit: safe_div(share, line.quantity),
            total: share,
            included: target.included,
            description: target.describe(cost, description),
        });
    }
    Ok(())
}

/// Applies a non-prorated cost as the same per-unit amount on every line.
fn apply_spread(
    lines: &mut [WorkLine<'_>],
    cost: &Cost,
    target: Target<'_>,
    total_quantity: Decimal,
) -> CoreResult<()> {
    let (per_unit, description) = match cost.per_unit_or_total {
        PerUnitOrTotal::Total => (
            safe_div(cost.value, total_quantity),
            format!("{} over {} units", cost.value.normalize(), total_quantity),
        ),
        PerUnitOrTotal::PerUnit => (cost.value, "Per unit".to_string()),
    };

    for line in lines.iter_mut() {
        let total = per_unit
            .checked_mul(line.quantity)
            .ok_or_else(|| too_large(target.field))?;
        line.entries.push(Entry {
            label: cost.label().to_string(),
            kind: cost.cost_type.breakdown_type(),
            bucket: bucket_for(cost),
            per_unit,
            total,
            included: target.included,
            description: target.describe(cost, description.clone()),
        });
    }
    Ok(())
}

/// Computes the line's export duty with its min/max clamp.
///
/// `None` when the duty leaves the decimal range.
fn duty_entry(line: &WorkLine<'_>, tariff: &TariffInfo, basis: DutyBasis) -> Option<Entry> {
    let rate = tariff.ad_valorem_rate;
    let base = match basis {
        DutyBasis::ProductValue => line.subtotal,
        DutyBasis::FobGrossUp => {
            let fob_ex_duty = line
                .subtotal
                .checked_add(line.included_total(Bucket::Local)?)?;
            let keep = Decimal::ONE - rate / Decimal::ONE_HUNDRED;
            if keep > Decimal::ZERO {
                fob_ex_duty.checked_div(keep)?
            } else {
                line.subtotal
            }
        }
    };

    let raw = percent_of(base, rate)?.checked_add(tariff.fixed_export_duty)?;
    let duty = tariff.clamp(raw);

    let mut description = format!(
        "{}% ad valorem + {} fixed",
        rate.normalize(),
        tariff.fixed_export_duty.normalize()
    );
    if duty != raw {
        description.push_str(&format!(", clamped from {}", raw.round_dp(2).normalize()));
    }

    Some(Entry {
        label: DUTY_LABEL.to_string(),
        kind: BreakdownType::Duty,
        bucket: Bucket::Duty,
        per_unit: safe_div(duty, line.quantity),
        total: duty,
        included: true,
        description: Some(description),
    })
}

/// Rounds and assembles the result.
fn finish(
    lines: Vec<WorkLine<'_>>,
    costs: &[Cost],
    incoterm: Incoterm,
    subtotal: Decimal,
    config: &PricingConfig,
) -> CoreResult<CalculationResult> {
    let precision = config.precision;
    let mode = config.rounding_mode;
    let round = |value: Decimal| round_money(value, precision, mode);
    let bucket_sum = |bucket: Bucket| {
        lines
            .iter()
            .map(|l| l.included_total(bucket))
            .try_fold(Decimal::ZERO, |acc, total| acc.checked_add(total?))
    };

    let local = bucket_sum(Bucket::Local).ok_or_else(|| too_large("totalFOB"))?;
    let dex = bucket_sum(Bucket::Duty).ok_or_else(|| too_large("totalDEX"))?;
    let freight_insurance =
        bucket_sum(Bucket::FreightInsurance).ok_or_else(|| too_large("totalCIF"))?;

    let total_fob = checked_sum([subtotal, local, dex]).ok_or_else(|| too_large("totalFOB"))?;
    let total_cif = total_fob
        .checked_add(freight_insurance)
        .ok_or_else(|| too_large("totalCIF"))?;
    let aggregate = incoterm.total_aggregate();
    let total_amount = match aggregate {
        TotalAggregate::ProductsOnly | TotalAggregate::Fob => total_fob,
        TotalAggregate::Cif => total_cif,
    };
    let total_expenses =
        checked_sum(costs.iter().map(|c| c.value)).ok_or_else(|| too_large("totalExpenses"))?;

    let mut items = Vec::with_capacity(lines.len());
    for (index, line) in lines.into_iter().enumerate() {
        let unit_price = line
            .unit_price()
            .map(round)
            .ok_or_else(|| too_large(format!("items[{}].unitPrice", index)))?;
        let total_price = unit_price
            .checked_mul(line.quantity)
            .map(round)
            .ok_or_else(|| too_large(format!("items[{}].totalPrice", index)))?;
        items.push(LinePricingResult {
            product_id: line.item.product_id.clone(),
            product_name: line.item.product_name.clone(),
            quantity: line.item.quantity,
            unit_price,
            total_price,
            breakdown: line
                .entries
                .into_iter()
                .map(|e| CostBreakdownLine {
                    label: e.label,
                    kind: e.kind,
                    amount_per_unit: round(e.per_unit),
                    amount_total: round(e.total),
                    included_in_incoterm: e.included,
                    description: e.description,
                })
                .collect(),
        });
    }

    Ok(CalculationResult {
        items,
        subtotal_products: round(subtotal),
        total_expenses: round(total_expenses),
        total_amount: round(total_amount),
        metadata: CalculationMetadata {
            incoterm,
            aggregate,
            total_fob: round(total_fob),
            total_cif: round(total_cif),
            total_dex: round(dex),
            precision,
            rounding_mode: mode,
        },
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::RoundingMode;
    use crate::types::CostType;
    use rust_decimal_macros::dec;

    fn too_large_field(err: CoreError) -> String {
        match err {
            CoreError::Validation(ValidationError::TooLarge { field }) => field,
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    fn wine(qty: i64) -> LineItem {
        LineItem::new("p1", "Malbec", dec!(10), qty)
    }

    #[test]
    fn test_no_costs_prices_at_base() {
        let config = PricingConfig::default();
        let result = calculate(&[wine(100)], &[], Incoterm::Fob, &config).unwrap();
        let line = &result.items[0];
        assert_eq!(line.unit_price, dec!(10.00));
        assert_eq!(line.total_price, dec!(1000.00));
        assert_eq!(line.breakdown.len(), 1);
        assert_eq!(line.breakdown[0].kind, BreakdownType::Product);
        assert_eq!(result.total_expenses, dec!(0));
        assert_eq!(result.total_dex(), dec!(0));
    }

    #[test]
    fn test_empty_items_fail_before_computing() {
        let err = calculate(&[], &[], Incoterm::Fob, &PricingConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { ref field }) if field == "items"
        ));
    }

    #[test]
    fn test_prorate_splits_by_weight() {
        let shares = prorate(dec!(300), &[dec!(1000), dec!(2000)]);
        assert_eq!(shares, vec![dec!(100), dec!(200)]);
    }

    #[test]
    fn test_prorate_zero_weights_give_zero_shares() {
        let shares = prorate(dec!(300), &[dec!(0), dec!(0)]);
        assert_eq!(shares, vec![Decimal::ZERO, Decimal::ZERO]);
    }

    #[test]
    fn test_zero_subtotal_proration_is_zero() {
        let items = vec![LineItem::new("free", "Sample", dec!(0), 10)];
        let costs = vec![Cost::new("c", CostType::Fixed, dec!(90), Incoterm::Fob).prorated()];
        let result = calculate(&items, &costs, Incoterm::Fob, &PricingConfig::default()).unwrap();

        let prorated = result.items[0].entry(BreakdownType::Prorated).unwrap();
        assert_eq!(prorated.amount_total, dec!(0));
        assert_eq!(result.items[0].unit_price, dec!(0));
        assert_eq!(result.total_expenses, dec!(90));
    }

    #[test]
    fn test_per_unit_cost_applies_to_every_unit() {
        let items = vec![wine(10), LineItem::new("p2", "Torrontes", dec!(8), 5)];
        let pallets = Cost::new("pal", CostType::Variable, dec!(0.40), Incoterm::Fca).per_unit();
        let costs = vec![pallets];
        let result = calculate(&items, &costs, Incoterm::Fob, &PricingConfig::default()).unwrap();

        let first = result.items[0].entry(BreakdownType::Variable).unwrap();
        assert_eq!(first.amount_per_unit, dec!(0.40));
        assert_eq!(first.amount_total, dec!(4.00));
        let second = result.items[1].entry(BreakdownType::Variable).unwrap();
        assert_eq!(second.amount_total, dec!(2.00));
        assert_eq!(result.total_fob(), dec!(146.00));
    }

    #[test]
    fn test_prorated_per_unit_pool_uses_total_quantity() {
        let items = vec![wine(10), LineItem::new("p2", "Torrontes", dec!(10), 30)];
        let costs = vec![Cost::new("lab", CostType::Fixed, dec!(1), Incoterm::Fob)
            .per_unit()
            .prorated()];
        let result = calculate(&items, &costs, Incoterm::Fob, &PricingConfig::default()).unwrap();

        // pool = 1 × 40 units, split 25% / 75%
        let first = result.items[0].entry(BreakdownType::Prorated).unwrap();
        assert_eq!(first.amount_total, dec!(10.00));
        let second = result.items[1].entry(BreakdownType::Prorated).unwrap();
        assert_eq!(second.amount_total, dec!(30.00));
    }

    #[test]
    fn test_duty_max_clamp() {
        let tariff = TariffInfo::ad_valorem(dec!(10)).with_max(dec!(40));
        let items = vec![wine(100).with_tariff(tariff)];
        let result = calculate(&items, &[], Incoterm::Fob, &PricingConfig::default()).unwrap();

        let duty = result.items[0].entry(BreakdownType::Duty).unwrap();
        assert_eq!(duty.amount_total, dec!(40.00));
        assert_eq!(duty.amount_per_unit, dec!(0.40));
        assert!(duty.description.as_deref().unwrap().contains("clamped from 100"));
        assert_eq!(result.total_dex(), dec!(40.00));
    }

    #[test]
    fn test_duty_included_even_at_exw() {
        let items = vec![wine(100).with_tariff(TariffInfo::ad_valorem(dec!(5)))];
        let result = calculate(&items, &[], Incoterm::Exw, &PricingConfig::default()).unwrap();

        let duty = result.items[0].entry(BreakdownType::Duty).unwrap();
        assert!(duty.included_in_incoterm);
        assert_eq!(result.items[0].unit_price, dec!(10.50));
        assert_eq!(result.total_amount, dec!(1050.00));
    }

    #[test]
    fn test_gross_up_falls_back_when_rate_is_total() {
        let items = vec![wine(10).with_tariff(TariffInfo::ad_valorem(dec!(100)))];
        let config = PricingConfig {
            duty_basis: DutyBasis::FobGrossUp,
            ..PricingConfig::default()
        };
        let result = calculate(&items, &[], Incoterm::Fob, &config).unwrap();
        assert_eq!(result.total_dex(), dec!(100.00));
    }

    #[test]
    fn test_fob_total_excludes_low_declared_freight() {
        // Inland freight declared at FCA is part of the line price but sits in
        // the freight bucket, so the FOB aggregate leaves it out.
        let costs = vec![Cost::new("inland", CostType::Freight, dec!(50), Incoterm::Fca)];
        let config = PricingConfig::default();
        let result = calculate(&[wine(100)], &costs, Incoterm::Fob, &config).unwrap();

        assert_eq!(result.items[0].unit_price, dec!(10.50));
        assert_eq!(result.total_fob(), dec!(1000.00));
        assert_eq!(result.total_cif(), dec!(1050.00));
        assert_eq!(result.total_amount, dec!(1000.00));

        let freight = result.items[0].entry(BreakdownType::Freight).unwrap();
        let description = freight.description.as_deref().unwrap();
        assert!(description.ends_with(OUTSIDE_TOTAL_NOTE), "{}", description);
    }

    #[test]
    fn test_freight_in_cif_total_has_no_outside_note() {
        let costs = vec![Cost::new("inland", CostType::Freight, dec!(50), Incoterm::Fca)];
        let config = PricingConfig::default();
        let result = calculate(&[wine(100)], &costs, Incoterm::Cif, &config).unwrap();

        let freight = result.items[0].entry(BreakdownType::Freight).unwrap();
        assert_eq!(freight.description.as_deref(), Some("50 over 100 units"));
        assert_eq!(result.total_amount, dec!(1050.00));
    }

    #[test]
    fn test_huge_line_subtotal_is_too_large() {
        let items = vec![LineItem::new("p", "P", dec!(100000000000000000000), 1_000_000_000)];
        let err = calculate(&items, &[], Incoterm::Fob, &PricingConfig::default()).unwrap_err();
        assert_eq!(too_large_field(err), "items[0].basePrice");
    }

    #[test]
    fn test_huge_per_unit_pool_is_too_large() {
        let items = vec![LineItem::new("p", "P", dec!(1), i64::MAX / 2)];
        let costs = vec![Cost::new("c", CostType::Fixed, dec!(100000000000), Incoterm::Fob)
            .per_unit()
            .prorated()];
        let err = calculate(&items, &costs, Incoterm::Fob, &PricingConfig::default()).unwrap_err();
        assert_eq!(too_large_field(err), "costs[0].value");
    }

    #[test]
    fn test_huge_spread_cost_is_too_large() {
        let items = vec![LineItem::new("p", "P", dec!(1), i64::MAX / 2)];
        let costs = vec![
            Cost::new("ok", CostType::Fixed, dec!(1), Incoterm::Fob),
            Cost::new("big", CostType::Variable, dec!(100000000000), Incoterm::Fob).per_unit(),
        ];
        let err = calculate(&items, &costs, Incoterm::Fob, &PricingConfig::default()).unwrap_err();
        assert_eq!(too_large_field(err), "costs[1].value");
    }

    #[test]
    fn test_huge_duty_rate_is_too_large() {
        let tariff = TariffInfo::ad_valorem(dec!(10000000000000000000000000));
        let items = vec![LineItem::new("p", "P", dec!(1000000), 1000).with_tariff(tariff)];
        let err = calculate(&items, &[], Incoterm::Fob, &PricingConfig::default()).unwrap_err();
        assert_eq!(too_large_field(err), "items[0].tariff");
    }

    #[test]
    fn test_rounding_mode_and_precision_apply_to_outputs() {
        let costs = vec![Cost::new("f", CostType::Freight, dec!(100), Incoterm::Cif)];
        let config = PricingConfig {
            precision: 3,
            rounding_mode: RoundingMode::Down,
            ..PricingConfig::default()
        };
        let result = calculate(&[wine(3)], &costs, Incoterm::Cif, &config).unwrap();

        let freight = result.items[0].entry(BreakdownType::Freight).unwrap();
        assert_eq!(freight.amount_per_unit.to_string(), "33.333");
        assert_eq!(result.items[0].unit_price.to_string(), "43.333");
        assert_eq!(result.items[0].total_price.to_string(), "129.999");
        assert_eq!(result.total_cif().to_string(), "130.000");
    }

    #[test]
    fn test_breakdown_keeps_input_order_with_duty_last() {
        let items = vec![wine(10).with_tariff(TariffInfo::ad_valorem(dec!(5)))];
        let costs = vec![
            Cost::new("a", CostType::Insurance, dec!(5), Incoterm::Cif),
            Cost::new("b", CostType::Fixed, dec!(5), Incoterm::Fob).named("Port Fees"),
        ];
        let result = calculate(&items, &costs, Incoterm::Cif, &PricingConfig::default()).unwrap();

        let labels: Vec<&str> = result.items[0]
            .breakdown
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec![PRODUCT_LABEL, "Insurance", "Port Fees", DUTY_LABEL]);
    }

    #[test]
    fn test_metadata_reports_aggregate() {
        let result = calculate(&[wine(1)], &[], Incoterm::Ddp, &PricingConfig::default()).unwrap();
        assert_eq!(result.metadata.incoterm, Incoterm::Ddp);
        assert_eq!(result.metadata.aggregate, TotalAggregate::Cif);
        assert_eq!(result.metadata.precision, 2);
    }
}
