//! # Commands
//!
//! The work behind each `comex` subcommand, kept free of argument parsing so
//! it can be driven from tests.
//!
//! ## Quote Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON ──► QuoteRequest ──► Incoterm::resolve(strict?)                   │
//! │                │                                                        │
//! │                ├──► resolve_costs(catalog)                              │
//! │                ├──► pricing_config(defaults ← request overrides)        │
//! │                ▼                                                        │
//! │          comex_core::calculate ──► CalculationResult                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write as _;

use comex_core::money::format_amount;
use comex_core::{calculate, CalculationResult, Incoterm, TotalAggregate};
use serde::Serialize;
use tracing::{info, info_span};

use crate::catalog::CostCatalog;
use crate::config::ComexConfig;
use crate::error::ApiError;
use crate::request::QuoteRequest;

// =============================================================================
// Quote
// =============================================================================

/// Options that apply to one quote invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteOptions {
    /// Price unknown Incoterm codes as FOB instead of rejecting them.
    pub lenient_incoterm: bool,
}

/// Prices a parsed request.
pub fn quote(
    request: &QuoteRequest,
    catalog: &dyn CostCatalog,
    config: &ComexConfig,
    options: QuoteOptions,
) -> Result<CalculationResult, ApiError> {
    let span = info_span!("quote", incoterm = %request.incoterm);
    let _enter = span.enter();

    let strict = config.incoterm.strict && !options.lenient_incoterm;
    let incoterm = Incoterm::resolve(&request.incoterm, strict)?;
    let costs = request.resolve_costs(catalog)?;
    let pricing = request.pricing_config(&config.pricing_config());

    let result = calculate(&request.products, &costs, incoterm, &pricing)?;
    info!(
        products = result.items.len(),
        expenses = costs.len(),
        total = %result.total_amount,
        "Quote priced"
    );
    Ok(result)
}

/// Parses and prices a raw JSON request.
pub fn quote_json(
    json: &str,
    catalog: &dyn CostCatalog,
    config: &ComexConfig,
    options: QuoteOptions,
) -> Result<CalculationResult, ApiError> {
    let request = QuoteRequest::from_json(json)?;
    quote(&request, catalog, config, options)
}

/// Serializes a result for stdout.
pub fn render_json(result: &CalculationResult, pretty: bool) -> Result<String, ApiError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    };
    rendered.map_err(|e| ApiError::internal(format!("Failed to serialize result: {}", e)))
}

/// Plain-text quote for the terminal.
pub fn render_summary(result: &CalculationResult) -> String {
    let precision = result.metadata.precision;
    let amount = |value| format_amount(value, precision);
    let mut out = String::new();

    let _ = writeln!(out, "Incoterm: {}", result.metadata.incoterm);
    let _ = writeln!(out);
    for line in &result.items {
        let _ = writeln!(
            out,
            "{} ({}) x{}  unit {}  total {}",
            line.product_name,
            line.product_id,
            line.quantity,
            amount(line.unit_price),
            amount(line.total_price)
        );
        for entry in &line.breakdown {
            let marker = if entry.included_in_incoterm { ' ' } else { '-' };
            let _ = writeln!(
                out,
                "  {} {:<28} {:>14} {:>16}",
                marker,
                entry.label,
                amount(entry.amount_per_unit),
                amount(entry.amount_total)
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Products  {:>18}", amount(result.subtotal_products));
    let _ = writeln!(out, "Expenses  {:>18}", amount(result.total_expenses));
    let _ = writeln!(out, "DEX       {:>18}", amount(result.total_dex()));
    let _ = writeln!(out, "FOB       {:>18}", amount(result.total_fob()));
    let _ = writeln!(out, "CIF       {:>18}", amount(result.total_cif()));
    let _ = write!(out, "Total     {:>18}", amount(result.total_amount));
    out
}

// =============================================================================
// Incoterms
// =============================================================================

/// One row of `comex incoterms`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncotermRow {
    pub code: &'static str,
    pub rank: u8,
    pub aggregate: TotalAggregate,
    pub includes_freight_and_insurance: bool,
    pub description: &'static str,
}

/// The closed Incoterm set in precedence order.
pub fn incoterm_table() -> Vec<IncotermRow> {
    Incoterm::ALL
        .into_iter()
        .map(|term| IncotermRow {
            code: term.code(),
            rank: term.rank(),
            aggregate: term.total_aggregate(),
            includes_freight_and_insurance: term.includes_freight_and_insurance(),
            description: term.description(),
        })
        .collect()
}

pub fn render_incoterms(rows: &[IncotermRow]) -> String {
    rows.iter()
        .map(|row| {
            let aggregate = match row.aggregate {
                TotalAggregate::ProductsOnly => "products",
                TotalAggregate::Fob => "FOB",
                TotalAggregate::Cif => "CIF",
            };
            format!("{}  {}  {:<8}  {}", row.code, row.rank, aggregate, row.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
