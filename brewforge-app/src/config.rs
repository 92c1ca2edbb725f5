use anyhow::{Context, Result};
use brewforge_core::mash::heat::DEFAULT_BOILING_POINT_C;
use brewforge_core::SpargeMethod;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Settings read from `brewforge.yaml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON snapshot of the ingredient and recipe store.
    pub store_path: String,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub enforce_validation: bool,
    pub default_boiling_point_c: f64,
    pub mash: MashDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MashDefaults {
    pub sparge: SpargeMethod,
    pub thickness_l_kg: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: "brewforge-store.json".to_string(),
            log_filter: "info".to_string(),
            enforce_validation: true,
            default_boiling_point_c: DEFAULT_BOILING_POINT_C,
            mash: MashDefaults::default(),
        }
    }
}

impl Default for MashDefaults {
    fn default() -> Self {
        Self {
            sparge: SpargeMethod::default(),
            thickness_l_kg: 3.0,
        }
    }
}

impl AppConfig {
    /// Loads the configuration, falling back to defaults when the file does
    /// not exist.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("brewforge.yaml");
        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("brewforge.yaml");
        fs::write(
            &path,
            "store_path: cellar.json\nmash:\n  sparge:\n    method: batch\n    batches: 2\n",
        )
        .unwrap();

        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.store_path, "cellar.json");
        assert_eq!(config.mash.sparge, SpargeMethod::Batch { batches: 2 });
        assert_eq!(config.mash.thickness_l_kg, 3.0);
        assert!(config.enforce_validation);
    }

    #[test]
    fn bad_yaml_is_reported_with_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("brewforge.yaml");
        fs::write(&path, "enforce_validation: [").unwrap();

        let err = AppConfig::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("brewforge.yaml"));
    }
}
