//! # Incoterm Policy
//!
//! The closed set of Incoterms and the two rules the engine asks about:
//! whether a cost is part of the price, and which aggregate is the total.
//!
//! ## Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Seller's obligations grow left to right                                │
//! │                                                                         │
//! │  EXW ─► FCA ─► FAS ─► FOB ─► CFR/CPT ─► CIF/CIP ─► DAP/DPU ─► DDP       │
//! │   0      1      2      3        4          5          6        7        │
//! │                                                                         │
//! │  A cost declared at FOB is included at FOB and at every term to the    │
//! │  right. Once included, it stays included (monotone).                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Total Aggregate
//! ```text
//! EXW, FCA                         → PRODUCTS_ONLY (goods + local costs)
//! FAS, FOB                         → FOB
//! CFR, CPT, CIF, CIP, DAP, DPU, DDP → CIF
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Incoterm
// =============================================================================

/// An Incoterm from the recognised closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Incoterm {
    /// Ex Works.
    Exw,
    /// Free Carrier.
    Fca,
    /// Free Alongside Ship.
    Fas,
    /// Free On Board.
    Fob,
    /// Cost and Freight.
    Cfr,
    /// Carriage Paid To.
    Cpt,
    /// Cost, Insurance and Freight.
    Cif,
    /// Carriage and Insurance Paid To.
    Cip,
    /// Delivered At Place.
    Dap,
    /// Delivered at Place Unloaded.
    Dpu,
    /// Delivered Duty Paid.
    Ddp,
}

/// Which aggregate of the calculation is reported as `totalAmount`.
///
/// Freight or insurance declared at or below FOB is included in the line
/// prices of a FAS/FOB (or earlier) quote, yet it belongs to neither
/// aggregate below FOB+freight. `totalAmount` then stays below the sum of
/// line totals, and those entries say so in their description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum TotalAggregate {
    /// Goods plus whatever local costs the term includes.
    ProductsOnly,
    /// Free On Board value.
    Fob,
    /// FOB plus freight and insurance.
    Cif,
}

impl Incoterm {
    /// Every recognised Incoterm, in precedence order.
    pub const ALL: [Incoterm; 11] = [
        Incoterm::Exw,
        Incoterm::Fca,
        Incoterm::Fas,
        Incoterm::Fob,
        Incoterm::Cfr,
        Incoterm::Cpt,
        Incoterm::Cif,
        Incoterm::Cip,
        Incoterm::Dap,
        Incoterm::Dpu,
        Incoterm::Ddp,
    ];

    /// Position in the precedence order. Terms sharing a rank transfer
    /// the same cost categories to the seller.
    pub const fn rank(self) -> u8 {
        match self {
            Incoterm::Exw => 0,
            Incoterm::Fca => 1,
            Incoterm::Fas => 2,
            Incoterm::Fob => 3,
            Incoterm::Cfr | Incoterm::Cpt => 4,
            Incoterm::Cif | Incoterm::Cip => 5,
            Incoterm::Dap | Incoterm::Dpu => 6,
            Incoterm::Ddp => 7,
        }
    }

    /// The three-letter code.
    pub const fn code(self) -> &'static str {
        match self {
            Incoterm::Exw => "EXW",
            Incoterm::Fca => "FCA",
            Incoterm::Fas => "FAS",
            Incoterm::Fob => "FOB",
            Incoterm::Cfr => "CFR",
            Incoterm::Cpt => "CPT",
            Incoterm::Cif => "CIF",
            Incoterm::Cip => "CIP",
            Incoterm::Dap => "DAP",
            Incoterm::Dpu => "DPU",
            Incoterm::Ddp => "DDP",
        }
    }

    /// Human-readable meaning, for listings.
    pub const fn description(self) -> &'static str {
        match self {
            Incoterm::Exw => "Ex Works: buyer collects at the seller's premises",
            Incoterm::Fca => "Free Carrier: seller hands goods to the buyer's carrier",
            Incoterm::Fas => "Free Alongside Ship: goods placed alongside the vessel",
            Incoterm::Fob => "Free On Board: seller's costs end once goods are loaded at origin",
            Incoterm::Cfr => "Cost and Freight: seller pays freight to destination port",
            Incoterm::Cpt => "Carriage Paid To: seller pays carriage to the named place",
            Incoterm::Cif => "Cost, Insurance and Freight: price includes freight and insurance",
            Incoterm::Cip => "Carriage and Insurance Paid To: carriage plus insurance",
            Incoterm::Dap => "Delivered At Place: seller delivers ready for unloading",
            Incoterm::Dpu => "Delivered at Place Unloaded: seller also unloads",
            Incoterm::Ddp => "Delivered Duty Paid: seller bears all costs and duties",
        }
    }

    /// The aggregate that constitutes `totalAmount` for this term.
    pub const fn total_aggregate(self) -> TotalAggregate {
        match self {
            Incoterm::Exw | Incoterm::Fca => TotalAggregate::ProductsOnly,
            Incoterm::Fas | Incoterm::Fob => TotalAggregate::Fob,
            Incoterm::Cfr
            | Incoterm::Cpt
            | Incoterm::Cif
            | Incoterm::Cip
            | Incoterm::Dap
            | Incoterm::Dpu
            | Incoterm::Ddp => TotalAggregate::Cif,
        }
    }

    /// True when the seller's price carries freight and insurance.
    pub const fn includes_freight_and_insurance(self) -> bool {
        matches!(self.total_aggregate(), TotalAggregate::Cif)
    }

    /// Parses a code, optionally falling back to FOB for unknown values.
    ///
    /// Strict mode is the default everywhere; the lenient fallback exists for
    /// legacy budgets stored with free-text terms.
    pub fn resolve(code: &str, strict: bool) -> Result<Incoterm, CoreError> {
        match code.parse::<Incoterm>() {
            Ok(term) => Ok(term),
            Err(err) if strict => Err(err),
            Err(_) => {
                warn!(code = %code, "Unknown incoterm, falling back to FOB");
                Ok(Incoterm::Fob)
            }
        }
    }
}

impl fmt::Display for Incoterm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Incoterm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Incoterm::ALL
            .into_iter()
            .find(|term| term.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownIncoterm(wanted.to_string()))
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Whether a cost declared from `cost_incoterm` onward is part of a quote
/// under `requested`.
///
/// ## Example
/// ```rust
/// use comex_core::incoterm::{is_cost_included, Incoterm};
///
/// assert!(is_cost_included(Incoterm::Fob, Incoterm::Cif));
/// assert!(!is_cost_included(Incoterm::Cif, Incoterm::Fob));
/// ```
pub const fn is_cost_included(cost_incoterm: Incoterm, requested: Incoterm) -> bool {
    requested.rank() >= cost_incoterm.rank()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing() {
        assert_eq!("FOB".parse::<Incoterm>().unwrap(), Incoterm::Fob);
        assert_eq!(" cif ".parse::<Incoterm>().unwrap(), Incoterm::Cif);
        assert_eq!("Ddp".parse::<Incoterm>().unwrap(), Incoterm::Ddp);
        assert!(matches!(
            "FOX".parse::<Incoterm>(),
            Err(CoreError::UnknownIncoterm(code)) if code == "FOX"
        ));
    }

    #[test]
    fn test_display_round_trips_every_code() {
        for term in Incoterm::ALL {
            assert_eq!(term.to_string().parse::<Incoterm>().unwrap(), term);
        }
    }

    #[test]
    fn test_ranks_follow_precedence() {
        assert!(Incoterm::Exw.rank() < Incoterm::Fca.rank());
        assert!(Incoterm::Fca.rank() < Incoterm::Fob.rank());
        assert!(Incoterm::Fob.rank() < Incoterm::Cfr.rank());
        assert_eq!(Incoterm::Cfr.rank(), Incoterm::Cpt.rank());
        assert_eq!(Incoterm::Cif.rank(), Incoterm::Cip.rank());
        assert!(Incoterm::Cif.rank() < Incoterm::Dap.rank());
        assert!(Incoterm::Dap.rank() < Incoterm::Ddp.rank());

        let ranks: Vec<u8> = Incoterm::ALL.iter().map(|t| t.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_inclusion_is_monotone() {
        for cost_term in Incoterm::ALL {
            let mut seen_included = false;
            for requested in Incoterm::ALL {
                let included = is_cost_included(cost_term, requested);
                if seen_included {
                    assert!(included, "{cost_term} dropped out at {requested}");
                }
                seen_included |= included;
            }
            assert!(is_cost_included(cost_term, cost_term));
        }
    }

    #[test]
    fn test_fca_cost_excluded_at_exw() {
        assert!(!is_cost_included(Incoterm::Fca, Incoterm::Exw));
        assert!(is_cost_included(Incoterm::Fca, Incoterm::Fob));
    }

    #[test]
    fn test_total_aggregate_table() {
        assert_eq!(Incoterm::Exw.total_aggregate(), TotalAggregate::ProductsOnly);
        assert_eq!(Incoterm::Fca.total_aggregate(), TotalAggregate::ProductsOnly);
        assert_eq!(Incoterm::Fob.total_aggregate(), TotalAggregate::Fob);
        let cif_terms = [
            Incoterm::Cfr,
            Incoterm::Cpt,
            Incoterm::Cif,
            Incoterm::Cip,
            Incoterm::Dap,
            Incoterm::Ddp,
        ];
        for term in cif_terms {
            assert_eq!(term.total_aggregate(), TotalAggregate::Cif);
            assert!(term.includes_freight_and_insurance());
        }
        assert!(!Incoterm::Fob.includes_freight_and_insurance());
    }

    #[test]
    fn test_resolve_strict_and_lenient() {
        assert!(Incoterm::resolve("XYZ", true).is_err());
        assert_eq!(Incoterm::resolve("XYZ", false).unwrap(), Incoterm::Fob);
        assert_eq!(Incoterm::resolve("exw", true).unwrap(), Incoterm::Exw);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Incoterm::Cif).unwrap(), "\"CIF\"");
        assert_eq!(serde_json::from_str::<Incoterm>("\"DDP\"").unwrap(), Incoterm::Ddp);
        assert_eq!(
            serde_json::to_string(&TotalAggregate::ProductsOnly).unwrap(),
            "\"PRODUCTS_ONLY\""
        );
    }
}
