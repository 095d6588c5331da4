//! Generator options from an optional TOML file and command line flags
//!
//! ```toml
//! namespace = "api"
//! slices_nullable = true
//! nullable_optional = false
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use sherpats_core::GenerateOptions;
use tracing::debug;

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub namespace: Option<String>,
    pub slices_nullable: Option<bool>,
    pub nullable_optional: Option<bool>,
}

impl FileConfig {
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_str(&content).with_context(|| format!("Invalid config: {:?}", path))
    }

    fn into_options(self) -> GenerateOptions {
        GenerateOptions {
            namespace: self.namespace,
            slices_nullable: self.slices_nullable.unwrap_or(false),
            nullable_optional: self.nullable_optional.unwrap_or(false),
        }
    }
}

/// Load options from the config file, or defaults without one.
pub fn load(path: Option<&Path>) -> Result<GenerateOptions> {
    let Some(path) = path else {
        return Ok(GenerateOptions::default());
    };
    let options = FileConfig::from_file(path)?.into_options();
    debug!(?path, ?options, "loaded config");
    Ok(options)
}

/// Options given as command line flags.
///
/// Boolean flags can only switch a toggle on; a toggle enabled in the config
/// file stays enabled.
#[derive(Debug, Default)]
pub struct Overrides {
    pub namespace: Option<String>,
    pub slices_nullable: bool,
    pub nullable_optional: bool,
}

impl Overrides {
    pub fn apply(self, mut options: GenerateOptions) -> GenerateOptions {
        if let Some(namespace) = self.namespace {
            options.namespace = Some(namespace);
        }
        options.slices_nullable |= self.slices_nullable;
        options.nullable_optional |= self.nullable_optional;
        options
    }
}
