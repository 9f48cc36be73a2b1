//! # Money Module
//!
//! Rounding policy and decimal helpers for monetary values.
//!
//! ## Why Decimal, Not Float?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Prorating $500 of freight over 150 units:                             │
//! │    3.3333333... per unit, summed back over 150 units                   │
//! │    f64 drifts; integer cents lose the fraction immediately              │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                   │
//! │    28 significant digits carried through every intermediate step       │
//! │    Rounded ONCE, when a value leaves the engine                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use comex_core::money::{round_money, RoundingMode};
//! use rust_decimal::Decimal;
//!
//! let share = Decimal::new(10, 0) / Decimal::new(3, 0); // 3.3333...
//! let shown = round_money(share, 2, RoundingMode::HalfUp);
//! assert_eq!(shown.to_string(), "3.33");
//! ```

use rust_decimal::prelude::RoundingStrategy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Default number of decimal digits in monetary output.
pub const DEFAULT_PRECISION: u32 = 2;

/// Largest precision accepted from callers.
pub const MAX_PRECISION: u32 = 10;

/// One hundred, for percentage math.
const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

// =============================================================================
// Rounding Mode
// =============================================================================

/// How monetary outputs are rounded to `precision` digits.
///
/// ```text
///            2.345   2.355   -2.345   2.341
/// HALF_UP    2.35    2.36    -2.35    2.34
/// HALF_EVEN  2.34    2.36    -2.34    2.34
/// DOWN       2.34    2.35    -2.34    2.34
/// UP         2.35    2.36    -2.35    2.35
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum RoundingMode {
    /// Round half away from zero (commercial rounding).
    #[default]
    HalfUp,
    /// Round half to even (Bankers Rounding).
    HalfEven,
    /// Truncate toward zero.
    Down,
    /// Round away from zero.
    Up,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfUp => write!(f, "HALF_UP"),
            RoundingMode::HalfEven => write!(f, "HALF_EVEN"),
            RoundingMode::Down => write!(f, "DOWN"),
            RoundingMode::Up => write!(f, "UP"),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "HALF_UP" => Ok(RoundingMode::HalfUp),
            "HALF_EVEN" | "BANKERS" => Ok(RoundingMode::HalfEven),
            "DOWN" | "TRUNCATE" => Ok(RoundingMode::Down),
            "UP" => Ok(RoundingMode::Up),
            _ => Err(ValidationError::Required {
                field: "roundingMode (HALF_UP, HALF_EVEN, DOWN, UP)".to_string(),
            }),
        }
    }
}

// =============================================================================
// Rounding & Arithmetic Helpers
// =============================================================================

/// Rounds `value` to `precision` digits and pins the scale, so `10` becomes
/// `10.00` at precision 2 and serializes the same way every time.
pub fn round_money(value: Decimal, precision: u32, mode: RoundingMode) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(precision, mode.strategy());
    rounded.rescale(precision);
    rounded
}

/// `amount × rate / 100`, or `None` when the product leaves the decimal range.
///
/// ## Example
/// ```rust
/// use comex_core::money::percent_of;
/// use rust_decimal::Decimal;
///
/// let duty = percent_of(Decimal::new(1000, 0), Decimal::new(5, 0));
/// assert_eq!(duty, Some(Decimal::new(50, 0)));
/// assert_eq!(percent_of(Decimal::MAX, Decimal::new(200, 0)), None);
/// ```
pub fn percent_of(amount: Decimal, rate_pct: Decimal) -> Option<Decimal> {
    amount.checked_mul(rate_pct)?.checked_div(HUNDRED)
}

/// Removes embedded VAT: `gross / (1 + rate/100)`.
///
/// ## Example
/// ```rust
/// use comex_core::money::back_out_vat;
/// use rust_decimal::Decimal;
///
/// let net = back_out_vat(Decimal::new(121, 0), Decimal::new(21, 0));
/// assert_eq!(net, Decimal::new(100, 0));
/// ```
pub fn back_out_vat(gross: Decimal, vat_rate_pct: Decimal) -> Decimal {
    let divisor = Decimal::ONE + vat_rate_pct / HUNDRED;
    gross.checked_div(divisor).unwrap_or(gross)
}

/// Division that yields zero instead of panicking when `denominator` is zero.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `pool × part / whole`; every share is zero when `whole` is zero.
pub fn proportional_share(pool: Decimal, part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    pool * safe_div(part, whole)
}

/// Formats an amount for plain-text reports: `1234567.5` → `1,234,567.50`.
///
/// The value is rounded half-up to `precision` first.
pub fn format_amount(value: Decimal, precision: u32) -> String {
    let rounded = round_money(value, precision, RoundingMode::HalfUp);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
