//! Configuration provider using Figment

use crate::{error::ConfigError, types::BuilderConfig, ConfigResult};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Environment variable prefix. Nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "CAMPAIGN_BUILDER_";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Get format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| ConfigError::UnsupportedFormat {
            format: if ext.is_empty() {
                path.display().to_string()
            } else {
                ext.to_string()
            },
        })
    }
}

/// Configuration provider using figment
///
/// Sources are merged in precedence order, later sources overriding earlier
/// ones: built-in defaults, then the configuration file if one was given, then
/// `CAMPAIGN_BUILDER_*` environment variables. Nothing is cached; each
/// [`load`](Self::load) reads the sources again.
#[derive(Debug, Default, Clone)]
pub struct ConfigProvider {
    file: Option<PathBuf>,
    skip_env: bool,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file after the defaults. The file must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Ignore environment variables, for callers that need reproducible output
    pub fn without_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Merge all sources, extract and validate.
    pub fn load(&self) -> ConfigResult<BuilderConfig> {
        debug!("Loading campaign builder configuration");

        let config: BuilderConfig = self.build_figment()?.extract()?;
        config.validate()?;

        info!(
            file = ?self.file,
            currency = %config.currency.symbol,
            enforce_limits = config.limits.enforce_on_create,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(BuilderConfig::default()));

        if let Some(path) = &self.file {
            figment = figment.merge(self.load_config_file(path)?);
        }

        if !self.skip_env {
            trace!(prefix = ENV_PREFIX, "Merging environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment)
    }

    fn load_config_file(&self, path: &Path) -> ConfigResult<Figment> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let format = ConfigFormat::from_path(path)?;
        trace!("Loading config file: {} ({:?})", path.display(), format);

        Ok(match format {
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        })
    }
}
