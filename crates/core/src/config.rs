//! Layered configuration for the cropcast platform.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (bundled artifact directories, the three
//!    production regions)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `CROPCAST_`, nested with `__`)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Top-level application configuration.
///
/// Aggregates artifact locations and the region roster into a single
/// loadable unit. Loaded once at startup; the registry and engines treat
/// it as read-only thereafter.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Where trained artifacts and history files live.
    pub artifacts: ArtifactsConfig,
    /// Forecasting settings.
    pub forecast: ForecastConfig,
}

/// Artifact and data directory locations.
///
/// Each configured region is expected to provide three files:
/// `<models_dir>/{region}_lstm.safetensors`,
/// `<models_dir>/{region}_scaler.json`, and
/// `<data_dir>/{region}_merged.csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory holding model weights and scaler stats.
    pub models_dir: PathBuf,
    /// Directory holding merged weather/price history CSVs.
    pub data_dir: PathBuf,
}

/// Forecasting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Regions to load artifacts for at startup (e.g., `["sirsi"]`).
    pub regions: Vec<String>,
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults.
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `CROPCAST_` and `__`
    ///    as the nesting separator (e.g.,
    ///    `CROPCAST_ARTIFACTS__MODELS_DIR=/srv/models`).
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("artifacts.models_dir", "models")?
            .set_default("artifacts.data_dir", "data")?
            .set_default(
                "forecast.regions",
                vec!["madikeri", "sirsi", "chikkamagaluru"],
            )?;

        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // The prefix separator must be set explicitly to `_` because the
        // `config` crate defaults it to the nesting separator when one is
        // provided. Without this, `CROPCAST_ARTIFACTS__DATA_DIR` would be
        // matched against prefix `cropcast__` instead of `cropcast_`.
        builder = builder.add_source(
            Environment::with_prefix("CROPCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration invariants.
    fn validate(&self) -> Result<()> {
        if self.forecast.regions.is_empty() {
            bail!("at least one region must be configured");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    /// Global mutex to serialize tests that manipulate environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_env() {
        std::env::remove_var("CROPCAST_ARTIFACTS__MODELS_DIR");
        std::env::remove_var("CROPCAST_ARTIFACTS__DATA_DIR");
    }

    /// Helper: create a temporary TOML config file and return its path.
    ///
    /// Uses `.toml` suffix so the `config` crate auto-detects the format.
    fn write_temp_toml(content: &str) -> (tempfile::NamedTempFile, PathBuf) {
        let mut f = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("create temp file");
        write!(f, "{}", content).expect("write temp file");
        let path = f.path().to_path_buf();
        (f, path)
    }

    #[test]
    fn test_load_defaults_only() {
        let _lock = lock_env();
        clear_env();

        let cfg = AppConfig::load(None).expect("load defaults");
        assert_eq!(cfg.artifacts.models_dir, PathBuf::from("models"));
        assert_eq!(cfg.artifacts.data_dir, PathBuf::from("data"));
        assert_eq!(
            cfg.forecast.regions,
            vec!["madikeri", "sirsi", "chikkamagaluru"]
        );
    }

    #[test]
    fn test_load_from_toml() {
        let _lock = lock_env();
        clear_env();

        let toml_content = r#"
[artifacts]
models_dir = "/srv/cropcast/models"
data_dir = "/srv/cropcast/data"

[forecast]
regions = ["sirsi"]
"#;
        let (_f, path) = write_temp_toml(toml_content);
        let cfg = AppConfig::load(Some(path)).expect("load from toml");

        assert_eq!(
            cfg.artifacts.models_dir,
            PathBuf::from("/srv/cropcast/models")
        );
        assert_eq!(cfg.artifacts.data_dir, PathBuf::from("/srv/cropcast/data"));
        assert_eq!(cfg.forecast.regions, vec!["sirsi"]);
    }

    #[test]
    fn test_env_var_overrides() {
        let _lock = lock_env();
        clear_env();
        std::env::set_var("CROPCAST_ARTIFACTS__MODELS_DIR", "/opt/models");

        let cfg = AppConfig::load(None).expect("load with env override");
        assert_eq!(cfg.artifacts.models_dir, PathBuf::from("/opt/models"));

        clear_env();
    }

    #[test]
    fn test_empty_regions_fails() {
        let _lock = lock_env();
        clear_env();

        let toml_content = r#"
[forecast]
regions = []
"#;
        let (_f, path) = write_temp_toml(toml_content);
        let result = AppConfig::load(Some(path));
        assert!(result.is_err());
        let err_msg = format!("{}", result.unwrap_err());
        assert!(err_msg.contains("region"));
    }
}
