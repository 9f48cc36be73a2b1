//! # comex-core: Export Budget Pricing Engine
//!
//! This crate is the **heart** of Comex Budget. It prices export budgets as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Comex Budget Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Dashboard / HTTP API (outside)                    │   │
//! │  │    Budgets ──► Products ──► Expenses ──► Quote preview          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 comex-cli (request layer)                       │   │
//! │  │    parse request, resolve cost ids, apply configured defaults   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ comex-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  engine   │  │ incoterm  │  │   │
//! │  │   │ LineItem  │  │ Rounding  │  │ calculate │  │  ranks    │  │   │
//! │  │   │   Cost    │  │   VAT     │  │ prorate   │  │ aggregate │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Inputs (LineItem, Cost, PricingConfig) and results
//! - [`money`] - Rounding policy and decimal helpers
//! - [`incoterm`] - Incoterm precedence and total aggregates
//! - [`validation`] - Input checks
//! - [`engine`] - The cost allocation engine
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, byte for byte
//! 2. **No I/O**: persistence and transport belong to callers
//! 3. **Decimal Money**: `rust_decimal`, rounded once on output
//! 4. **Explicit Errors**: typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use comex_core::{calculate, Cost, CostType, Incoterm, LineItem, PricingConfig};
//! use rust_decimal::Decimal;
//!
//! let items = vec![LineItem::new("p1", "Malbec", Decimal::new(10, 0), 100)];
//! let costs = vec![
//!     Cost::new("f1", CostType::Freight, Decimal::new(300, 0), Incoterm::Cif),
//! ];
//!
//! let fob = calculate(&items, &costs, Incoterm::Fob, &PricingConfig::default()).unwrap();
//! let cif = calculate(&items, &costs, Incoterm::Cif, &PricingConfig::default()).unwrap();
//!
//! assert_eq!(fob.total_amount.to_string(), "1000.00");
//! assert_eq!(cif.total_amount.to_string(), "1300.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod incoterm;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::calculate;
pub use error::{CoreError, CoreResult, ValidationError};
pub use incoterm::{Incoterm, TotalAggregate};
pub use money::RoundingMode;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines in a single budget.
///
/// Budgets in practice carry hundreds of lines; the cap keeps a malformed
/// request from pinning a worker.
pub const MAX_LINE_ITEMS: usize = 10_000;
