//! Campaign builder configuration using Figment
//!
//! Configuration covers everything the rendering engine needs that is not part
//! of a campaign document: how money is formatted, which illustrative values a
//! preview shows before a campaign has real donations, the fallback suggested
//! donation amounts, and whether field limits are enforced when a field is
//! created.
//!
//! # Precedence
//!
//! Later sources override earlier ones:
//!
//! 1. Built-in defaults ([`BuilderConfig::default`])
//! 2. An optional configuration file (TOML, YAML or JSON by extension)
//! 3. Environment variables prefixed `CAMPAIGN_BUILDER_`, with `__` separating
//!    nested keys (`CAMPAIGN_BUILDER_CURRENCY__SYMBOL=€`)
//!
//! # Example
//!
//! ```no_run
//! use campaign_builder_config::ConfigProvider;
//!
//! let config = ConfigProvider::new()
//!     .with_file("campaign-builder.toml")
//!     .load()?;
//! assert!(config.currency.decimals <= 4);
//! # Ok::<(), campaign_builder_config::ConfigError>(())
//! ```
//!
//! ## Example TOML
//!
//! ```toml
//! [currency]
//! symbol = "€"
//! position = "after-space"
//! decimal_separator = ","
//! thousands_separator = "."
//!
//! [donations]
//! suggested_amounts = [10, 25, 50]
//!
//! [limits]
//! enforce_on_create = false
//! ```

pub mod error;
pub mod provider;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigFormat, ConfigProvider, ENV_PREFIX};
pub use types::{
    AuthConfig, BuilderConfig, CurrencyConfig, CurrencyPosition, DisplayConfig,
    DonationDefaults, LimitsConfig, PreviewConfig, TokenEntry,
};

use std::path::Path;

/// Load configuration from defaults, an optional file and the environment.
pub fn load_configuration(file: Option<&Path>) -> ConfigResult<BuilderConfig> {
    let provider = match file {
        Some(path) => ConfigProvider::new().with_file(path),
        None => ConfigProvider::new(),
    };
    provider.load()
}
