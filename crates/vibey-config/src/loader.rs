//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;
use crate::schema::Config;

/// Env var consulted when `provider.api_key` is not set.
pub const PROVIDER_KEY_ENV: &str = "OPENAI_API_KEY";

/// Env var consulted when `audit.api_key` is not set.
pub const AUDIT_KEY_ENV: &str = "ULTRACONTEXTAPI";

/// Config files looked up relative to the working directory, in order.
pub const LOCAL_CONFIG_FILES: [&str; 2] = ["config/vibey.toml", "vibey.toml"];

/// Local env file loaded before configuration.
pub const LOCAL_ENV_FILE: &str = ".env.local";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Resolve and load the effective configuration.
    ///
    /// An explicit path must exist. Otherwise `config/vibey.toml`,
    /// `./vibey.toml` and then `~/.vibey/config.toml` are tried, falling back to defaults. API keys
    /// missing from the file are taken from the environment.
    pub fn resolve(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::discover() {
                Some(path) => {
                    debug!("Loading config from {}", path.display());
                    Self::load(&path)?
                }
                None => {
                    debug!("No config file found, using defaults");
                    Config::default()
                }
            },
        };
        Self::apply_env(&mut config, |name| std::env::var(name).ok());
        Ok(config)
    }

    fn discover() -> Option<PathBuf> {
        if let Some(local) = LOCAL_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
        {
            return Some(local);
        }
        let home = dirs::home_dir()?.join(".vibey").join("config.toml");
        home.exists().then_some(home)
    }

    /// Fill unset API keys from environment lookups.
    pub fn apply_env<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if config.provider.api_key.is_none() {
            config.provider.api_key = lookup(PROVIDER_KEY_ENV).filter(|v| !v.is_empty());
        }
        if config.audit.api_key.is_none() {
            config.audit.api_key = lookup(AUDIT_KEY_ENV).filter(|v| !v.is_empty());
        }
    }

    /// Load a dotenv file, overriding variables already set.
    ///
    /// Returns `Ok(false)` when the file does not exist.
    pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
        if !path.exists() {
            return Ok(false);
        }
        dotenvy::from_filename_override(path)
            .map_err(|e| ConfigError::EnvFile(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded environment from {}", path.display());
        Ok(true)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidValue {
            field: "env".to_string(),
            message: e.to_string(),
        })?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.vibey`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
