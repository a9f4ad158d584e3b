// Configuration loader
// Layers defaults, ~/.tunechat/config.toml, environment and CLI flags

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::*;
use super::settings::Config;
use crate::storage::{SaveMode, StorageFormat};

/// Contents of the optional TOML config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub background_file: Option<PathBuf>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub storage: FileStorageConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileStorageConfig {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub format: Option<StorageFormat>,
    #[serde(default)]
    pub mode: Option<SaveMode>,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Values given on the command line; they win over every other layer
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub background_file: Option<PathBuf>,
    pub store_format: Option<StorageFormat>,
    pub store_path: Option<PathBuf>,
    pub save_mode: Option<SaveMode>,
    pub no_save: bool,
}

/// ~/.tunechat/config.toml, if a home directory can be determined
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from .env, the config file, the environment and `overrides`
pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let file = read_config_file(overrides.config_path.as_deref())?;
    resolve(file, |key| std::env::var(key).ok(), overrides)
}

/// Parse the config file.
///
/// An explicitly requested file must exist; the default location is optional.
pub fn read_config_file(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let file: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    tracing::debug!("Loaded config file {}", path.display());
    Ok(file)
}

/// Merge the layers into a validated `Config`.
///
/// `env` looks up an environment variable; empty values count as unset.
pub fn resolve<E>(file: FileConfig, env: E, overrides: &ConfigOverrides) -> Result<Config>
where
    E: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let Some(api_key) = env(API_KEY_ENV).or(file.api_key) else {
        bail!(
            "No Gemini API key found.\n\n\
            Set the environment variable (or add it to a .env file):\n\
            export {}=\"...\"\n\n\
            or add `api_key = \"...\"` to {}",
            API_KEY_ENV,
            default_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("~/{}/{}", CONFIG_DIR_NAME, CONFIG_FILE_NAME))
        );
    };

    let mut config = Config::with_api_key(api_key);

    if let Some(model) = overrides.model.clone().or_else(|| env(MODEL_ENV)).or(file.model) {
        config.model = model;
    }
    if let Some(base_url) = file.base_url {
        config.base_url = base_url;
    }
    if let Some(background) = overrides
        .background_file
        .clone()
        .or_else(|| env(BACKGROUND_FILE_ENV).map(PathBuf::from))
        .or(file.background_file)
    {
        config.background_file = background;
    }
    if let Some(timeout) = file.request_timeout_secs {
        config.request_timeout_secs = timeout;
    }

    let storage = &mut config.storage;
    if let Some(enabled) = file.storage.enabled {
        storage.enabled = enabled;
    }
    if overrides.no_save {
        storage.enabled = false;
    }
    if let Some(format) = overrides.store_format.or(file.storage.format) {
        storage.format = format;
    }
    if let Some(mode) = overrides.save_mode.or(file.storage.mode) {
        storage.mode = mode;
    }
    storage.path = overrides.store_path.clone().or(file.storage.path);

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = resolve(FileConfig::default(), env_from(&[]), &ConfigOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_empty_env_key_counts_as_unset() {
        let result = resolve(
            FileConfig::default(),
            env_from(&[("GEMINI_API_KEY", "")]),
            &ConfigOverrides::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_env_only() {
        let config = resolve(
            FileConfig::default(),
            env_from(&[("GEMINI_API_KEY", "env-key")]),
            &ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.storage.format, StorageFormat::Csv);
        assert_eq!(config.storage.mode, SaveMode::Condensed);
    }

    #[test]
    fn test_env_beats_file_and_flags_beat_env() {
        let file = FileConfig {
            api_key: Some("file-key".to_string()),
            model: Some("file-model".to_string()),
            ..Default::default()
        };
        let env = env_from(&[("GEMINI_API_KEY", "env-key"), ("GEMINI_MODEL", "env-model")]);

        let config = resolve(file.clone(), &env, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.model, "env-model");

        let overrides = ConfigOverrides {
            model: Some("flag-model".to_string()),
            ..Default::default()
        };
        let config = resolve(file, &env, &overrides).unwrap();
        assert_eq!(config.model, "flag-model");
    }

    #[test]
    fn test_storage_overrides() {
        let file: FileConfig = toml::from_str(
            r#"
            api_key = "file-key"

            [storage]
            format = "json"
            mode = "full"
            path = "data/rated.json"
            "#,
        )
        .unwrap();

        let config = resolve(file.clone(), env_from(&[]), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.storage.format, StorageFormat::Json);
        assert_eq!(config.storage.mode, SaveMode::Full);
        assert_eq!(config.storage.resolved_path(), PathBuf::from("data/rated.json"));
        assert!(config.storage.enabled);

        let overrides = ConfigOverrides {
            no_save: true,
            save_mode: Some(SaveMode::Condensed),
            ..Default::default()
        };
        let config = resolve(file, env_from(&[]), &overrides).unwrap();
        assert!(!config.storage.enabled);
        assert_eq!(config.storage.mode, SaveMode::Condensed);
    }

    #[test]
    fn test_read_explicit_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"abc\"\nrequest_timeout_secs = 5").unwrap();

        let parsed = read_config_file(Some(file.path())).unwrap();
        assert_eq!(parsed.api_key.as_deref(), Some("abc"));
        assert_eq!(parsed.request_timeout_secs, Some(5));
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let result = read_config_file(Some(Path::new("/nonexistent/tunechat.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("modle = \"typo\"");
        assert!(result.is_err());
    }
}
