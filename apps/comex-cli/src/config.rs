//! # Comex Configuration
//!
//! Default pricing options for every quote this binary prices.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Request `config` object (highest priority, per quote)              │
//! │     { "precision": 3, "roundingMode": "HALF_EVEN" }                    │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     COMEX_PRECISION=3                                                  │
//! │     COMEX_ROUNDING_MODE=half_even                                      │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/budget/comex.toml (Linux)                                │
//! │     ~/Library/Application Support/com.comex.budget/comex.toml (macOS)  │
//! │     or --config <path>                                                 │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     precision 2, HALF_UP, no VAT back-out, strict Incoterms            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # comex.toml
//! [pricing]
//! precision = 2
//! rounding_mode = "HALF_UP"        # HALF_UP | HALF_EVEN | DOWN | UP
//! adjust_for_vat = false
//! vat_rate = "21"                  # percent, required with adjust_for_vat
//! duty_basis = "PRODUCT_VALUE"     # PRODUCT_VALUE | FOB_GROSS_UP
//!
//! [incoterm]
//! strict = true                    # false falls back to FOB on unknown codes
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use comex_core::money::{DEFAULT_PRECISION, RoundingMode};
use comex_core::validation::validate_config;
use comex_core::{DutyBasis, PricingConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "comex.toml";

// =============================================================================
// Config Error
// =============================================================================

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Values parsed but make no sense together.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available")]
    NoPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Pricing Defaults
// =============================================================================

/// `[pricing]` section: defaults for [`PricingConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingDefaults {
    #[serde(default = "default_precision")]
    pub precision: u32,

    #[serde(default)]
    pub rounding_mode: RoundingMode,

    #[serde(default)]
    pub adjust_for_vat: bool,

    /// VAT percent, stored as a string to keep it exact.
    #[serde(default)]
    pub vat_rate: Option<Decimal>,

    #[serde(default)]
    pub duty_basis: DutyBasis,
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

impl Default for PricingDefaults {
    fn default() -> Self {
        PricingDefaults {
            precision: default_precision(),
            rounding_mode: RoundingMode::default(),
            adjust_for_vat: false,
            vat_rate: None,
            duty_basis: DutyBasis::default(),
        }
    }
}

impl PricingDefaults {
    /// The engine config these defaults describe.
    pub fn to_pricing_config(&self) -> PricingConfig {
        PricingConfig {
            adjust_for_vat: self.adjust_for_vat,
            vat_rate: self.vat_rate,
            precision: self.precision,
            rounding_mode: self.rounding_mode,
            duty_basis: self.duty_basis,
        }
    }
}

// =============================================================================
// Incoterm Settings
// =============================================================================

/// `[incoterm]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncotermSettings {
    /// Reject unknown Incoterm codes instead of pricing them as FOB.
    #[serde(default = "default_true")]
    pub strict: bool,
}

fn default_true() -> bool {
    true
}

impl Default for IncotermSettings {
    fn default() -> Self {
        IncotermSettings { strict: true }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComexConfig {
    #[serde(default)]
    pub pricing: PricingDefaults,

    #[serde(default)]
    pub incoterm: IncotermSettings,
}

impl ComexConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (comex.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml()?)?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Pretty TOML rendering of the effective configuration.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_config(&self.pricing.to_pricing_config())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies `COMEX_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("COMEX_PRECISION") {
            match raw.trim().parse::<u32>() {
                Ok(p) => {
                    debug!(precision = p, "Overriding precision from environment");
                    self.pricing.precision = p;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid COMEX_PRECISION"),
            }
        }

        if let Some(raw) = lookup("COMEX_ROUNDING_MODE") {
            match raw.parse::<RoundingMode>() {
                Ok(mode) => self.pricing.rounding_mode = mode,
                Err(_) => warn!(value = %raw, "Ignoring invalid COMEX_ROUNDING_MODE"),
            }
        }

        if let Some(raw) = lookup("COMEX_ADJUST_FOR_VAT") {
            match parse_flag(&raw) {
                Some(flag) => self.pricing.adjust_for_vat = flag,
                None => warn!(value = %raw, "Ignoring invalid COMEX_ADJUST_FOR_VAT"),
            }
        }

        if let Some(raw) = lookup("COMEX_VAT_RATE") {
            match Decimal::from_str(raw.trim()) {
                Ok(rate) => self.pricing.vat_rate = Some(rate),
                Err(_) => warn!(value = %raw, "Ignoring invalid COMEX_VAT_RATE"),
            }
        }

        if let Some(raw) = lookup("COMEX_DUTY_BASIS") {
            match parse_duty_basis(&raw) {
                Some(basis) => self.pricing.duty_basis = basis,
                None => warn!(value = %raw, "Unknown duty basis in environment"),
            }
        }

        if let Some(raw) = lookup("COMEX_STRICT_INCOTERM") {
            match parse_flag(&raw) {
                Some(flag) => self.incoterm.strict = flag,
                None => warn!(value = %raw, "Ignoring invalid COMEX_STRICT_INCOTERM"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "comex", "budget")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Engine defaults for a quote.
    pub fn pricing_config(&self) -> PricingConfig {
        self.pricing.to_pricing_config()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_duty_basis(raw: &str) -> Option<DutyBasis> {
    match raw.trim().to_uppercase().replace('-', "_").as_str() {
        "PRODUCT_VALUE" => Some(DutyBasis::ProductValue),
        "FOB_GROSS_UP" | "GROSS_UP" => Some(DutyBasis::FobGrossUp),
        _ => None,
    }
}
