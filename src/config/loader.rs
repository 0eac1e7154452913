// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Generator configuration: which features to produce and how to run them.
///
/// It is typically loaded from a YAML configuration file and turned into a
/// generator with [`Generator::from_config`](crate::Generator::from_config).
///
/// # Fields
/// * `features` - Requested feature names, in output column order
/// * `strategy` - The execution strategy (optional, defaults to `sequential`)
/// * `executor_options` - Executor-specific configuration options (optional)
///
/// # Example
/// ```yaml
/// features: [pickup_hour, pickup_weekday]
/// strategy: level
/// executor_options:
///   max_concurrency: 4
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub features: Vec<String>,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
}

/// Execution strategy for a generator.
///
/// # Variants
/// * `Sequential` - Computes features one at a time in plan order
/// * `Level` - Computes each dependency level concurrently
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Sequential,
    Level,
}

/// Executor-specific configuration options.
///
/// # Fields
/// * `max_concurrency` - Maximum number of concurrent feature computations
///   within a level (optional, defaults to the number of CPU cores)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorOptions {
    pub max_concurrency: Option<usize>,
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GeneratorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: GeneratorConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
///
/// Feature names are checked against a registry only when the generator is
/// built; here the config is checked for an empty request and a zero
/// concurrency limit.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<GeneratorConfig, ConfigError> {
    let cfg = load_config(path)?;

    if cfg.features.is_empty() {
        return Err(ConfigError::Invalid(
            "at least one feature must be requested".to_string(),
        ));
    }
    if cfg.executor_options.max_concurrency == Some(0) {
        return Err(ConfigError::Invalid(
            "executor_options.max_concurrency must be greater than zero".to_string(),
        ));
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
features: [pickup_hour, pickup_weekday]
strategy: level
executor_options:
  max_concurrency: 2
"#;

        let cfg: GeneratorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.strategy, Strategy::Level);
        assert_eq!(cfg.features, vec!["pickup_hour", "pickup_weekday"]);
        assert_eq!(cfg.executor_options.max_concurrency, Some(2));
    }

    #[test]
    fn test_defaults() {
        let cfg: GeneratorConfig = serde_yaml::from_str("features: [pickup_hour]").unwrap();
        assert_eq!(cfg.strategy, Strategy::Sequential);
        assert_eq!(cfg.executor_options.max_concurrency, None);
    }

    #[test]
    fn test_unknown_strategy_fails_to_parse() {
        let file = write_config("features: [a]\nstrategy: reactive\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let file = write_config("features: [pickup_hour]\nstrategy: sequential\n");
        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.features, vec!["pickup_hour"]);
    }

    #[test]
    fn test_load_and_validate_empty_features() {
        let file = write_config("features: []\n");
        let error_msg = load_and_validate_config(file.path()).unwrap_err().to_string();
        assert!(error_msg.contains("at least one feature"));
    }

    #[test]
    fn test_load_and_validate_zero_concurrency() {
        let file = write_config("features: [a]\nexecutor_options:\n  max_concurrency: 0\n");
        assert!(matches!(
            load_and_validate_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
