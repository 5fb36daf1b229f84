//! Configuration Management
//!
//! Package metadata and the components directory, resolved with Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Project config (`introspec.toml`)
//! 3. Environment variables (`INTROSPEC_*`)
//! 4. CLI arguments (highest priority, applied by the command layer)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::config::{CONFIG_FILE, ENV_PREFIX};
use crate::constants::schema::DEFAULT_VERSION;
use crate::types::{IntrospecError, Result};

/// Package-level settings for schema generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Package name used in resource identifiers
    pub name: String,
    /// Display name for the generated document; defaults to the name
    pub display_name: Option<String>,
    pub version: String,
    /// Directory holding the component definition files
    pub components: PathBuf,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: "components".to_string(),
            display_name: None,
            version: DEFAULT_VERSION.to_string(),
            components: PathBuf::from("."),
        }
    }
}

impl PackageConfig {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(IntrospecError::Config("package name is empty".to_string()));
        }
        if self.version.is_empty() {
            return Err(IntrospecError::Config(
                "package version is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the full resolution chain:
    /// defaults → project file → env vars.
    pub fn load() -> Result<PackageConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(PackageConfig::default()));

        let project_path = PathBuf::from(CONFIG_FILE);
        if project_path.exists() {
            debug!("Loading config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: PackageConfig = figment
            .extract()
            .map_err(|e| IntrospecError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file only.
    pub fn load_from_file(path: &Path) -> Result<PackageConfig> {
        let config: PackageConfig = Figment::new()
            .merge(Serialized::defaults(PackageConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| IntrospecError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}
