//! # Error Types
//!
//! Domain-specific error types for comex-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  comex-core errors (this file)                                         │
//! │  ├── CoreError        - Calculation failures                           │
//! │  └── ValidationError  - Input shape/range violations                   │
//! │                                                                         │
//! │  comex-cli errors (app)                                                │
//! │  ├── ConfigError      - Config file / environment problems             │
//! │  └── ApiError         - What callers see (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant names the offending field path (`items[1].quantity`) so the
//! request layer can answer with a 4xx that points at the bad value. A
//! failed calculation never returns a partial result.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the calculation engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested Incoterm is not in the closed set.
    ///
    /// ## When This Occurs
    /// - A request carries `"incoterm": "FOX"`
    /// - A cost declares an inclusion Incoterm nobody recognises
    #[error("Unknown incoterm: '{0}'")]
    UnknownIncoterm(String),

    /// Input validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any computation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field or collection is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is so large that pricing it would leave the decimal range.
    #[error("{field}: amount too large")]
    TooLarge { field: String },

    /// A lower bound exceeds its upper bound.
    #[error("{field}: minimum {min} is greater than maximum {max}")]
    InvalidRange {
        field: String,
        min: String,
        max: String,
    },
}

impl ValidationError {
    /// Returns the field path the error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooLarge { field }
            | ValidationError::InvalidRange { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
