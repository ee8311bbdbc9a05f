use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Keys every configuration file is expected to carry.
const EXPECTED_KEYS: &[&str] = &["database", "lock_timeout_minutes", "unknown_lithology_code"];

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(cfg: &Config) -> AppResult<()> {
        let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
        println!("{}", yaml);
        Ok(())
    }

    /// Keys missing from the file at `path` (defaults apply to them).
    pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
        let content = fs::read_to_string(path)?;
        let yaml: Value =
            serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;

        let map = yaml
            .as_mapping()
            .ok_or_else(|| AppError::Config("configuration is not a mapping".into()))?;

        Ok(EXPECTED_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(Value::String((*k).to_string())))
            .collect())
    }
}
