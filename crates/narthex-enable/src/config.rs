//! Configuration for the narthex-enable tool.

use serde::{Deserialize, Serialize};

use narthex_sparql::SparqlConfig;

use crate::error::{EnableError, Result};

/// Top-level configuration.
///
/// Loaded from `narthex.toml` (`[sparql]` and `[enable]` sections) and
/// `NARTHEX__`-prefixed environment variables, e.g.
/// `NARTHEX__SPARQL__BASE_URL`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sparql: SparqlConfig,

    #[serde(default)]
    pub enable: EnableConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnableConfig {
    /// What to do when one actor's update fails.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// Behavior after a failed per-actor update.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and move on to the next actor.
    #[default]
    Continue,
    /// Stop at the first failure; remaining actors are reported as skipped.
    Halt,
}

/// Environment variable prefix: `NARTHEX__SECTION__KEY`.
pub const ENV_PREFIX: &str = "NARTHEX";

/// Load configuration from `{file_prefix}.toml` (optional) and the environment.
pub fn load_config(file_prefix: &str) -> Result<AppConfig> {
    load_config_with_env(file_prefix, ENV_PREFIX)
}

/// Like [`load_config`], reading `{env_prefix}__SECTION__KEY` variables.
/// Environment values override the file.
pub fn load_config_with_env(file_prefix: &str, env_prefix: &str) -> Result<AppConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| EnableError::Config(e.to_string()))?;

    cfg.try_deserialize::<AppConfig>()
        .map_err(|e| EnableError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> String {
        let path = dir.path().join("narthex.toml");
        std::fs::write(&path, contents).unwrap();
        dir.path().join("narthex").to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.sparql.base_url, "http://localhost:3030");
        assert_eq!(config.sparql.timeout_secs, None);
        assert_eq!(config.enable.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent").to_string_lossy().into_owned();
        let config = load_config(&prefix).unwrap();
        assert_eq!(config.enable.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(
            &dir,
            r#"
[sparql]
base_url = "https://store.example.org/fuseki"
timeout_secs = 30

[enable]
failure_policy = "halt"
"#,
        );

        let config = load_config(&prefix).unwrap();
        assert_eq!(config.sparql.base_url, "https://store.example.org/fuseki");
        assert_eq!(config.sparql.timeout_secs, Some(30));
        assert_eq!(config.enable.failure_policy, FailurePolicy::Halt);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(&dir, "[enable]\nfailure_policy = \"continue\"\n");

        let config = load_config(&prefix).unwrap();
        assert_eq!(config.sparql.base_url, "http://localhost:3030");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(
            &dir,
            r#"
[sparql]
base_url = "https://store.example.org/fuseki"
timeout_secs = 30

[enable]
failure_policy = "continue"
"#,
        );

        // Own prefix so parallel tests reading NARTHEX__* are unaffected.
        std::env::set_var("NARTHEXENVTEST__SPARQL__BASE_URL", "http://env-store:3030");
        std::env::set_var("NARTHEXENVTEST__ENABLE__FAILURE_POLICY", "halt");
        let loaded = load_config_with_env(&prefix, "NARTHEXENVTEST");
        std::env::remove_var("NARTHEXENVTEST__SPARQL__BASE_URL");
        std::env::remove_var("NARTHEXENVTEST__ENABLE__FAILURE_POLICY");

        let config = loaded.unwrap();
        assert_eq!(config.sparql.base_url, "http://env-store:3030");
        assert_eq!(config.enable.failure_policy, FailurePolicy::Halt);
        // Keys absent from the environment still come from the file.
        assert_eq!(config.sparql.timeout_secs, Some(30));
    }

    #[test]
    fn test_invalid_policy_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = write_config(&dir, "[enable]\nfailure_policy = \"sometimes\"\n");

        let err = load_config(&prefix).unwrap_err();
        assert!(matches!(err, EnableError::Config(_)));
    }
}
