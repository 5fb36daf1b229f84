//! CLI Commands
//!
//! One module per subcommand, wired up in `main.rs`.

pub mod components;
pub mod outputs;
pub mod schema;

use std::path::PathBuf;

use crate::config::{ConfigLoader, PackageConfig};
use crate::types::Result;

/// Settings shared by all commands, resolved from config with CLI
/// overrides applied on top.
pub struct CommandContext {
    pub config: PackageConfig,
}

impl CommandContext {
    pub fn resolve(
        dir: Option<PathBuf>,
        name: Option<String>,
        version: Option<String>,
    ) -> Result<Self> {
        let mut config = ConfigLoader::load()?;
        if let Some(dir) = dir {
            config.components = dir;
        }
        if let Some(name) = name {
            config.name = name;
        }
        if let Some(version) = version {
            config.version = version;
        }
        config.validate()?;
        Ok(Self { config })
    }
}
