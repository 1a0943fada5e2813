use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    /// Appended to locations that have no extension.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Directory that top-level relative locations resolve against.
    /// Falls back to the working directory.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

fn default_extension() -> String {
    plainload_source::DEFAULT_EXTENSION.into()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            base_dir: None,
        }
    }
}

impl LoaderConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            tracing::info!("No loader config found at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: LoaderConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
