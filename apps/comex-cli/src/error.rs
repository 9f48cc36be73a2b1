//! # API Error Type
//!
//! Unified error type returned to callers of the request layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Comex Budget                           │
//! │                                                                         │
//! │  QuoteRequest JSON                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Malformed JSON? ───── serde_json::Error ───────────┐                   │
//! │         │                                           │                   │
//! │         ▼                                           │                   │
//! │  Unknown incoterm? ─── CoreError::UnknownIncoterm ──┤                   │
//! │         │                                           │                   │
//! │         ▼                                           ▼                   │
//! │  Unknown costId? ──────────────────────────────► ApiError ──► stderr    │
//! │         │                                           ▲                   │
//! │         ▼                                           │                   │
//! │  calculate() ───────── CoreError::Validation ───────┘                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CalculationResult ──► stdout                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! ```json
//! {
//!   "code": "NOT_FOUND",
//!   "message": "Cost not found: broker-fee"
//! }
//! ```

use comex_core::CoreError;
use serde::Serialize;

/// Error returned from request handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced cost does not exist (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Incoterm outside the closed set (400)
    UnknownIncoterm,

    /// Unexpected failure, e.g. serializing the result (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status a server front end would answer with.
    pub const fn http_status(self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::ValidationError | ErrorCode::UnknownIncoterm => 400,
            ErrorCode::Internal => 500,
        }
    }

    /// Process exit status: the HTTP status class, so 4 or 5.
    pub const fn exit_status(self) -> u8 {
        (self.http_status() / 100) as u8
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// JSON rendering for stderr.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL","message":{:?}}}"#, self.message)
        })
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownIncoterm(_) => {
                ApiError::new(ErrorCode::UnknownIncoterm, err.to_string())
            }
            CoreError::Validation(ref e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Malformed request bodies.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::validation(format!("Malformed request: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
