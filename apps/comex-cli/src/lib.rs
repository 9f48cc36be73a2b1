//! # comex-cli
//!
//! Request layer around `comex-core`: configuration, quote requests, the cost
//! catalog and the commands behind the `comex` binary.
//!
//! ## Modules
//!
//! - [`config`] - `comex.toml` + `COMEX_*` environment defaults
//! - [`request`] - `QuoteRequest` wire types
//! - [`catalog`] - `CostCatalog` lookups for `{ "costId": ... }` expenses
//! - [`error`] - `ApiError { code, message }`
//! - [`commands`] - quote and Incoterm listing

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod request;

pub use catalog::{CostCatalog, InMemoryCatalog};
pub use config::{ComexConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use request::QuoteRequest;
