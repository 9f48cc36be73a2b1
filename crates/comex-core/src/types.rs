//! # Domain Types
//!
//! Inputs and outputs of one budget calculation.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUTS                                                                 │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │      Cost       │   │  PricingConfig  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  productId      │   │  type           │   │  adjustForVAT   │       │
//! │  │  basePrice      │   │  value          │   │  vatRate        │       │
//! │  │  quantity       │   │  prorate        │   │  precision      │       │
//! │  │  tariff? ──────►│   │  perUnitOrTotal │   │  roundingMode   │       │
//! │  │   TariffInfo    │   │  incoterm       │   │  dutyBasis      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  OUTPUTS                                                                │
//! │  CalculationResult ──► LinePricingResult[] ──► CostBreakdownLine[]     │
//! │          └──────────► CalculationMetadata (FOB / CIF / DEX)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All amounts are `Decimal` and serialize as strings. Field names follow
//! the dashboard's JSON (`unitPrice`, `perUnitOrTotal`, `metadata.totalFOB`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::incoterm::{Incoterm, TotalAggregate};
use crate::money::{RoundingMode, DEFAULT_PRECISION};

// =============================================================================
// Line Item
// =============================================================================

/// One product line of a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Product identifier owned by the catalogue.
    pub product_id: String,

    /// Display name copied into the result.
    #[serde(default)]
    pub product_name: String,

    /// Unit price before any cost (VAT-inclusive when `adjustForVAT` is set).
    #[ts(as = "String")]
    pub base_price: Decimal,

    /// Units on this line (> 0).
    pub quantity: i64,

    /// Export tariff of the product, if any.
    #[serde(default)]
    pub tariff: Option<TariffInfo>,
}

impl LineItem {
    /// Creates a line without a tariff.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        base_price: Decimal,
        quantity: i64,
    ) -> Self {
        LineItem {
            product_id: product_id.into(),
            product_name: product_name.into(),
            base_price,
            quantity,
            tariff: None,
        }
    }

    /// Attaches an export tariff.
    pub fn with_tariff(mut self, tariff: TariffInfo) -> Self {
        self.tariff = Some(tariff);
        self
    }

    /// `basePrice × quantity`.
    #[inline]
    pub fn line_subtotal(&self) -> Decimal {
        self.base_price * Decimal::from(self.quantity)
    }
}

// =============================================================================
// Tariff Info
// =============================================================================

/// Export duty (DEX) parameters of a product's tariff position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TariffInfo {
    /// Ad valorem rate in percent (5 = 5%).
    #[ts(as = "String")]
    pub ad_valorem_rate: Decimal,

    /// Fixed amount added per line.
    #[serde(default)]
    #[ts(as = "String")]
    pub fixed_export_duty: Decimal,

    /// Lower clamp for the line's duty.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub export_duty_min_amount: Option<Decimal>,

    /// Upper clamp for the line's duty.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub export_duty_max_amount: Option<Decimal>,
}

impl TariffInfo {
    /// A pure ad valorem tariff with no fixed part and no clamps.
    pub fn ad_valorem(rate_pct: Decimal) -> Self {
        TariffInfo {
            ad_valorem_rate: rate_pct,
            fixed_export_duty: Decimal::ZERO,
            export_duty_min_amount: None,
            export_duty_max_amount: None,
        }
    }

    pub fn with_fixed(mut self, amount: Decimal) -> Self {
        self.fixed_export_duty = amount;
        self
    }

    pub fn with_min(mut self, amount: Decimal) -> Self {
        self.export_duty_min_amount = Some(amount);
        self
    }

    pub fn with_max(mut self, amount: Decimal) -> Self {
        self.export_duty_max_amount = Some(amount);
        self
    }

    /// Applies the optional min/max bounds to a raw duty.
    pub fn clamp(&self, raw: Decimal) -> Decimal {
        let mut duty = raw;
        if let Some(min) = self.export_duty_min_amount {
            duty = duty.max(min);
        }
        if let Some(max) = self.export_duty_max_amount {
            duty = duty.min(max);
        }
        duty
    }
}

// =============================================================================
// Cost
// =============================================================================

/// Category of an expense line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum CostType {
    Fixed,
    Variable,
    Freight,
    Insurance,
}

impl CostType {
    /// Freight and insurance sit between the FOB and CIF aggregates.
    pub const fn is_freight_or_insurance(self) -> bool {
        matches!(self, CostType::Freight | CostType::Insurance)
    }

    /// Breakdown entry type for a non-prorated cost of this category.
    pub const fn breakdown_type(self) -> BreakdownType {
        match self {
            CostType::Fixed => BreakdownType::Fixed,
            CostType::Variable => BreakdownType::Variable,
            CostType::Freight => BreakdownType::Freight,
            CostType::Insurance => BreakdownType::Insurance,
        }
    }

    /// Label used when a cost carries no name.
    pub const fn default_label(self) -> &'static str {
        match self {
            CostType::Fixed => "Fixed Cost",
            CostType::Variable => "Variable Cost",
            CostType::Freight => "Freight",
            CostType::Insurance => "Insurance",
        }
    }
}

/// Whether a cost's value is per unit or for the whole budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PerUnitOrTotal {
    PerUnit,
    #[default]
    Total,
}

/// The Incoterm from which a cost becomes part of the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IncotermRef {
    pub name: Incoterm,
}

/// One expense attached to a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cost {
    pub id: String,

    /// Display label, e.g. "Customs Broker".
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub cost_type: CostType,

    #[ts(as = "String")]
    pub value: Decimal,

    /// Distribute across lines by value share instead of by units.
    #[serde(default)]
    pub prorate: bool,

    #[serde(default)]
    pub per_unit_or_total: PerUnitOrTotal,

    pub incoterm_to_be_included: IncotermRef,
}

impl Cost {
    /// Creates a non-prorated TOTAL cost included from `incoterm` onward.
    pub fn new(
        id: impl Into<String>,
        cost_type: CostType,
        value: Decimal,
        incoterm: Incoterm,
    ) -> Self {
        Cost {
            id: id.into(),
            name: None,
            cost_type,
            value,
            prorate: false,
            per_unit_or_total: PerUnitOrTotal::Total,
            incoterm_to_be_included: IncotermRef { name: incoterm },
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn prorated(mut self) -> Self {
        self.prorate = true;
        self
    }

    pub fn per_unit(mut self) -> Self {
        self.per_unit_or_total = PerUnitOrTotal::PerUnit;
        self
    }

    /// The Incoterm from which this cost is included.
    #[inline]
    pub fn incoterm(&self) -> Incoterm {
        self.incoterm_to_be_included.name
    }

    /// Name if given, otherwise the category label.
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.cost_type.default_label(),
        }
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// Kind of a breakdown entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum BreakdownType {
    Product,
    Freight,
    Insurance,
    Fixed,
    Variable,
    Duty,
    Prorated,
}

/// One component of a line's unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CostBreakdownLine {
    pub label: String,

    #[serde(rename = "type")]
    pub kind: BreakdownType,

    #[ts(as = "String")]
    pub amount_per_unit: Decimal,

    #[ts(as = "String")]
    pub amount_total: Decimal,

    /// False for costs shown for transparency but outside the Incoterm.
    pub included_in_incoterm: bool,

    pub description: Option<String>,
}

/// Priced result for one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinePricingResult {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub unit_price: Decimal,
    #[ts(as = "String")]
    pub total_price: Decimal,
    pub breakdown: Vec<CostBreakdownLine>,
}

impl LinePricingResult {
    /// Breakdown entries that count toward the unit price.
    pub fn included(&self) -> impl Iterator<Item = &CostBreakdownLine> {
        self.breakdown.iter().filter(|line| line.included_in_incoterm)
    }

    /// First breakdown entry of the given kind.
    pub fn entry(&self, kind: BreakdownType) -> Option<&CostBreakdownLine> {
        self.breakdown.iter().find(|line| line.kind == kind)
    }
}

// =============================================================================
// Calculation Result
// =============================================================================

/// Aggregates reported next to the lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CalculationMetadata {
    pub incoterm: Incoterm,

    /// Which aggregate `totalAmount` was taken from.
    pub aggregate: TotalAggregate,

    #[serde(rename = "totalFOB")]
    #[ts(as = "String")]
    pub total_fob: Decimal,

    #[serde(rename = "totalCIF")]
    #[ts(as = "String")]
    pub total_cif: Decimal,

    /// Export duties across all lines.
    #[serde(rename = "totalDEX")]
    #[ts(as = "String")]
    pub total_dex: Decimal,

    pub precision: u32,
    pub rounding_mode: RoundingMode,
}

/// Full output of one calculation. Never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CalculationResult {
    pub items: Vec<LinePricingResult>,

    #[ts(as = "String")]
    pub subtotal_products: Decimal,

    /// Sum of every cost's declared value, included or not.
    #[ts(as = "String")]
    pub total_expenses: Decimal,

    #[ts(as = "String")]
    pub total_amount: Decimal,

    pub metadata: CalculationMetadata,
}

impl CalculationResult {
    #[inline]
    pub fn total_fob(&self) -> Decimal {
        self.metadata.total_fob
    }

    #[inline]
    pub fn total_cif(&self) -> Decimal {
        self.metadata.total_cif
    }

    #[inline]
    pub fn total_dex(&self) -> Decimal {
        self.metadata.total_dex
    }

    /// Looks up a line by product id.
    pub fn item(&self, product_id: &str) -> Option<&LinePricingResult> {
        self.items.iter().find(|item| item.product_id == product_id)
    }
}

// =============================================================================
// Configuration Types
// =============================================================================

/// Base on which the ad valorem export duty is levied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum DutyBasis {
    /// `lineSubtotal × rate`.
    #[default]
    ProductValue,
    /// The line's FOB value, which itself contains the duty:
    /// `fobExDuty / (1 - rate) × rate`.
    FobGrossUp,
}

/// Per-calculation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PricingConfig {
    /// Treat base prices as VAT-inclusive and back the VAT out first.
    #[serde(rename = "adjustForVAT")]
    pub adjust_for_vat: bool,

    /// VAT rate in percent; required when `adjust_for_vat` is set.
    #[ts(as = "Option<String>")]
    pub vat_rate: Option<Decimal>,

    /// Decimal digits in monetary output.
    pub precision: u32,

    pub rounding_mode: RoundingMode,

    pub duty_basis: DutyBasis,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            adjust_for_vat: false,
            vat_rate: None,
            precision: DEFAULT_PRECISION,
            rounding_mode: RoundingMode::default(),
            duty_basis: DutyBasis::default(),
        }
    }
}

impl PricingConfig {
    /// Config that backs `vat_rate_pct` out of every base price.
    pub fn with_vat_back_out(vat_rate_pct: Decimal) -> Self {
        PricingConfig {
            adjust_for_vat: true,
            vat_rate: Some(vat_rate_pct),
            ..Self::default()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
