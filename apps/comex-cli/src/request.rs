//! # Quote Request
//!
//! Wire shape of a quote as the dashboard posts it.
//!
//! ```json
//! {
//!   "products": [
//!     { "productId": "wine-01", "productName": "Malbec", "basePrice": "10.00",
//!       "quantity": 100, "tariff": { "adValoremRate": "5" } }
//!   ],
//!   "expenses": [
//!     { "costId": "broker" },
//!     { "id": "freight", "type": "FREIGHT", "value": "500",
//!       "incotermToBeIncluded": { "name": "CIF" } }
//!   ],
//!   "incoterm": "FOB",
//!   "config": { "precision": 2, "roundingMode": "HALF_UP" }
//! }
//! ```

use comex_core::money::RoundingMode;
use comex_core::{Cost, DutyBasis, LineItem, PricingConfig};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::CostCatalog;
use crate::error::ApiError;

/// A quote to price.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub products: Vec<LineItem>,

    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,

    /// Raw code; resolved against the closed set by the caller.
    pub incoterm: String,

    #[serde(default)]
    pub config: Option<ConfigOverrides>,
}

impl QuoteRequest {
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Expands catalog references into full costs, keeping input order.
    pub fn resolve_costs(&self, catalog: &dyn CostCatalog) -> Result<Vec<Cost>, ApiError> {
        self.expenses
            .iter()
            .map(|entry| match entry {
                ExpenseEntry::Inline(cost) => Ok(cost.clone()),
                ExpenseEntry::Ref { cost_id } => catalog
                    .find_cost(cost_id)
                    .ok_or_else(|| ApiError::not_found("Cost", cost_id)),
            })
            .collect()
    }

    /// `defaults` with this request's overrides applied.
    pub fn pricing_config(&self, defaults: &PricingConfig) -> PricingConfig {
        match self.config {
            Some(ref overrides) => overrides.apply_to(defaults.clone()),
            None => defaults.clone(),
        }
    }
}

/// An expense given in full or by catalog id.
///
/// An object carrying `costId` is a reference; anything else must parse as a
/// full cost, and its errors are reported as such.
#[derive(Debug, Clone)]
pub enum ExpenseEntry {
    Inline(Cost),
    Ref { cost_id: String },
}

impl<'de> Deserialize<'de> for ExpenseEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value.get("costId") {
            Some(Value::String(id)) => Ok(ExpenseEntry::Ref {
                cost_id: id.clone(),
            }),
            Some(other) => Err(de::Error::custom(format!(
                "costId must be a string, got {}",
                other
            ))),
            None => Cost::deserialize(value)
                .map(ExpenseEntry::Inline)
                .map_err(de::Error::custom),
        }
    }
}

/// Per-request config; absent fields keep the configured default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(rename = "adjustForVAT")]
    pub adjust_for_vat: Option<bool>,
    pub vat_rate: Option<Decimal>,
    pub precision: Option<u32>,
    pub rounding_mode: Option<RoundingMode>,
    pub duty_basis: Option<DutyBasis>,
}

impl ConfigOverrides {
    pub fn apply_to(&self, mut config: PricingConfig) -> PricingConfig {
        if let Some(flag) = self.adjust_for_vat {
            config.adjust_for_vat = flag;
        }
        if let Some(rate) = self.vat_rate {
            config.vat_rate = Some(rate);
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(mode) = self.rounding_mode {
            config.rounding_mode = mode;
        }
        if let Some(basis) = self.duty_basis {
            config.duty_basis = basis;
        }
        config
    }
}
