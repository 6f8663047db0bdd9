use crate::parser::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `xsdgraph.toml`. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct XsdGraphConfig {
    /// Fail on unknown elements (default true)
    pub strict: Option<bool>,
    /// Accepted XSD tag prefixes; `""` accepts unprefixed tags
    pub prefixes: Option<Vec<String>>,
    /// Follow `import` schema locations (default true)
    pub follow_imports: Option<bool>,
}

impl XsdGraphConfig {
    /// Parser options with the configured values over the defaults
    pub fn parse_options(&self) -> ParseOptions {
        let defaults = ParseOptions::default();
        ParseOptions {
            strict: self.strict.unwrap_or(defaults.strict),
            prefixes: self.prefixes.clone().unwrap_or(defaults.prefixes),
        }
    }

    pub fn follow_imports(&self) -> bool {
        self.follow_imports.unwrap_or(true)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("xsdgraph.toml")
}

/// Load the config file, if there is one.
///
/// An explicitly given path must exist; the default path may be absent.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<XsdGraphConfig>> {
    let explicit = path.is_some();
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        if explicit {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: XsdGraphConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}
