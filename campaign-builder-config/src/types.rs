//! Configuration types
//!
//! Every section derives `Default` and is marked `#[serde(default)]`, so a
//! configuration file only needs to mention the keys it changes.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Largest number of minor-unit digits accepted for currency formatting
const MAX_DECIMALS: u8 = 4;

/// Complete campaign builder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BuilderConfig {
    pub currency: CurrencyConfig,
    pub preview: PreviewConfig,
    pub donations: DonationDefaults,
    pub display: DisplayConfig,
    pub limits: LimitsConfig,
    pub auth: AuthConfig,
}

impl BuilderConfig {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency.symbol.trim().is_empty() {
            return Err(ConfigError::validation("currency.symbol must not be empty"));
        }
        if let Some(entry) = self.auth.tokens.iter().find(|e| e.token.trim().is_empty()) {
            return Err(ConfigError::validation(format!(
                "auth.tokens entry for '{}' has an empty token",
                entry.actor
            )));
        }
        if self.currency.decimals > MAX_DECIMALS {
            return Err(ConfigError::validation(format!(
                "currency.decimals must be at most {MAX_DECIMALS}, got {}",
                self.currency.decimals
            )));
        }
        if self.currency.decimals > 0 && self.currency.decimal_separator.is_empty() {
            return Err(ConfigError::validation(
                "currency.decimal_separator must not be empty when decimals > 0",
            ));
        }
        if self.currency.decimal_separator == self.currency.thousands_separator {
            return Err(ConfigError::validation(
                "currency.decimal_separator and currency.thousands_separator must differ",
            ));
        }
        if self.preview.goal < 0.0 || self.preview.donated < 0.0 {
            return Err(ConfigError::validation(
                "preview.goal and preview.donated must not be negative",
            ));
        }
        if let Some(amount) = self
            .donations
            .suggested_amounts
            .iter()
            .find(|amount| !amount.is_finite() || **amount <= 0.0)
        {
            return Err(ConfigError::validation(format!(
                "donations.suggested_amounts must be positive, got {amount}"
            )));
        }
        Ok(())
    }
}

/// Where the currency symbol goes relative to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CurrencyPosition {
    /// `$5`
    #[default]
    Before,
    /// `5€`
    After,
    /// `$ 5`
    BeforeSpace,
    /// `5 €`
    AfterSpace,
}

/// Money formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub symbol: String,
    pub position: CurrencyPosition,
    pub decimals: u8,
    pub decimal_separator: String,
    pub thousands_separator: String,
    /// Drop the fractional part when it is zero (`$5` instead of `$5.00`)
    pub trim_zero_decimals: bool,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            position: CurrencyPosition::Before,
            decimals: 2,
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
            trim_zero_decimals: true,
        }
    }
}

/// Illustrative values shown in preview mode when no real campaign state exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub donated: f64,
    pub goal: f64,
    pub donor_count: u64,
    pub time_remaining: String,
    /// Names used by the donor wall placeholder
    pub donor_names: Vec<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            donated: 2500.0,
            goal: 5000.0,
            donor_count: 38,
            time_remaining: "12 days left".to_string(),
            donor_names: vec![
                "Anonymous".to_string(),
                "A. Donor".to_string(),
                "The Smith Family".to_string(),
            ],
        }
    }
}

/// Donation form defaults for campaigns that have not configured their own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonationDefaults {
    pub suggested_amounts: Vec<f64>,
    pub allow_custom_amount: bool,
}

impl Default for DonationDefaults {
    fn default() -> Self {
        Self {
            suggested_amounts: vec![5.0, 10.0, 15.0],
            allow_custom_amount: true,
        }
    }
}

/// Display-mode behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    /// Default for the per-field "round donation percentage" toggle
    pub round_percentages: bool,
}

/// Field limit enforcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Reject field creation once a type's instance limit is reached
    pub enforce_on_create: bool,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            enforce_on_create: true,
        }
    }
}

/// Request tokens accepted by the builder's mutating operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: Vec<TokenEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TokenEntry {
    pub token: String,
    pub actor: String,
    /// Read-only actors may render but not add fields or save settings
    pub read_only: bool,
}
