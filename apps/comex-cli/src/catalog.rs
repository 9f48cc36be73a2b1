//! # Cost Catalog
//!
//! Saved expense definitions that quote requests can reference by id.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "expenses": [ { "costId": "broker" }, { ...inline cost... } ]          │
//! │                        │                                                │
//! │                        ▼                                                │
//! │               CostCatalog::find_cost("broker")                          │
//! │                        │                                                │
//! │           Some(cost) ──┴── None ──► ApiError NOT_FOUND                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The persistence layer proper lives outside this workspace; the CLI ships an
//! in-memory catalog loaded from a JSON array of costs.

use std::collections::HashMap;
use std::path::Path;

use comex_core::Cost;
use tracing::{debug, warn};

/// Lookup of stored costs by id.
pub trait CostCatalog {
    fn find_cost(&self, id: &str) -> Option<Cost>;
}

/// Catalog backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    costs: HashMap<String, Cost>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog; a later cost with the same id replaces an earlier one.
    pub fn from_costs(costs: impl IntoIterator<Item = Cost>) -> Self {
        let mut catalog = Self::new();
        for cost in costs {
            catalog.insert(cost);
        }
        catalog
    }

    /// Parses a JSON array of cost objects.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let costs: Vec<Cost> = serde_json::from_str(json)?;
        Ok(Self::from_costs(costs))
    }

    /// Reads a JSON catalog file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&contents)?;
        if catalog.is_empty() {
            warn!(?path, "Cost catalog is empty; every costId will be not found");
        } else {
            debug!(?path, costs = catalog.len(), "Cost catalog loaded");
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, cost: Cost) {
        self.costs.insert(cost.id.clone(), cost);
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl CostCatalog for InMemoryCatalog {
    fn find_cost(&self, id: &str) -> Option<Cost> {
        self.costs.get(id).cloned()
    }
}
