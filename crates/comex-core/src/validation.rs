//! # Validation Module
//!
//! Domain checks run before any calculation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (serde)                                        │
//! │  ├── JSON shape, enum variants, decimal syntax                         │
//! │  └── Unknown incoterm codes                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── items non-empty, quantity > 0                                     │
//! │  ├── prices, cost values, tariff fields ≥ 0                            │
//! │  └── config ranges (precision, VAT rate)                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Engine: assumes every input below is in range                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first violation wins; field paths index into the caller's arrays.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::MAX_PRECISION;
use crate::types::{Cost, LineItem, PricingConfig, TariffInfo};
use crate::MAX_LINE_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Example
/// ```rust
/// use comex_core::validation::validate_quantity;
///
/// assert!(validate_quantity("items[0].quantity", 5).is_ok());
/// assert!(validate_quantity("items[0].quantity", 0).is_err());
/// ```
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates that an amount is zero or greater.
pub fn validate_non_negative(field: &str, amount: Decimal) -> ValidationResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a percentage in `0..=100`.
pub fn validate_percentage(field: &str, rate: Decimal) -> ValidationResult<()> {
    validate_non_negative(field, rate)?;
    if rate > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a tariff: non-negative fields and `min <= max`.
pub fn validate_tariff(field: &str, tariff: &TariffInfo) -> ValidationResult<()> {
    validate_non_negative(&format!("{field}.adValoremRate"), tariff.ad_valorem_rate)?;
    validate_non_negative(&format!("{field}.fixedExportDuty"), tariff.fixed_export_duty)?;

    if let Some(min) = tariff.export_duty_min_amount {
        validate_non_negative(&format!("{field}.exportDutyMinAmount"), min)?;
    }
    if let Some(max) = tariff.export_duty_max_amount {
        validate_non_negative(&format!("{field}.exportDutyMaxAmount"), max)?;
    }

    if let (Some(min), Some(max)) = (tariff.export_duty_min_amount, tariff.export_duty_max_amount) {
        if min > max {
            return Err(ValidationError::InvalidRange {
                field: field.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the budget lines.
pub fn validate_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if items.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    for (i, item) in items.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: format!("items[{i}].productId"),
            });
        }
        validate_quantity(&format!("items[{i}].quantity"), item.quantity)?;
        validate_non_negative(&format!("items[{i}].basePrice"), item.base_price)?;
        if let Some(ref tariff) = item.tariff {
            validate_tariff(&format!("items[{i}].tariff"), tariff)?;
        }
    }

    Ok(())
}

/// Validates the expense lines. An empty list is fine.
pub fn validate_costs(costs: &[Cost]) -> ValidationResult<()> {
    for (i, cost) in costs.iter().enumerate() {
        validate_non_negative(&format!("costs[{i}].value"), cost.value)?;
    }
    Ok(())
}

/// Validates calculation options.
pub fn validate_config(config: &PricingConfig) -> ValidationResult<()> {
    if config.precision > MAX_PRECISION {
        return Err(ValidationError::OutOfRange {
            field: "config.precision".to_string(),
            min: 0,
            max: MAX_PRECISION as i64,
        });
    }

    if config.adjust_for_vat {
        let rate = config.vat_rate.ok_or_else(|| ValidationError::Required {
            field: "config.vatRate".to_string(),
        })?;
        validate_percentage("config.vatRate", rate)?;
    }

    Ok(())
}

/// Runs every check the engine relies on.
pub fn validate_calculation(
    items: &[LineItem],
    costs: &[Cost],
    config: &PricingConfig,
) -> ValidationResult<()> {
    validate_items(items)?;
    validate_costs(costs)?;
    validate_config(config)
}

// =============================================================================
// Unit Tests
// =============================================================================
