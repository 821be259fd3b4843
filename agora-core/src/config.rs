//! Global agora configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::DEFAULT_PROVIDER_TIMEOUT_SECS;
use crate::error::{AgoraError, AgoraResult};

static DEFAULT_DATABASE_PATH: &str = "~/.local/share/agora/events.db";
static DEFAULT_PROVIDER: &str = "firestore";
static DEFAULT_COLLECTION: &str = "events";

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// Where remote events live and how to reach them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Provider name; resolved to the `agora-provider-<name>` executable.
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// Anything else is passed through to the provider untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            provider: default_provider(),
            collection: default_collection(),
            extra: HashMap::new(),
        }
    }
}

impl RemoteSettings {
    /// Parameters sent with every document command.
    pub fn remote_config(&self) -> Map<String, Value> {
        let mut map: Map<String, Value> = self
            .extra
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        map.insert("collection".into(), Value::String(self.collection.clone()));
        map
    }
}

/// Configuration at ~/.config/agora/config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgoraConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_timeout_secs")]
    pub provider_timeout_secs: u64,

    #[serde(default)]
    pub remote: RemoteSettings,
}

impl Default for AgoraConfig {
    fn default() -> Self {
        AgoraConfig {
            database_path: default_database_path(),
            provider_timeout_secs: default_timeout_secs(),
            remote: RemoteSettings::default(),
        }
    }
}

impl AgoraConfig {
    pub fn config_path() -> AgoraResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgoraError::Config("Could not determine config directory".into()))?
            .join("agora");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, creating a commented default on first run.
    /// `AGORA_*` environment variables override file values.
    pub fn load() -> AgoraResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> AgoraResult<Self> {
        Self::load_with_env(path, None)
    }

    /// `env` replaces the process environment when given.
    /// `AGORA_PROVIDER_TIMEOUT_SECS` sets a top-level key; nested keys use
    /// `__`, as in `AGORA_REMOTE__COLLECTION`.
    fn load_with_env(path: &Path, env: Option<config::Map<String, String>>) -> AgoraResult<Self> {
        let environment = Environment::with_prefix("AGORA")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env);

        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(environment)
            .build()
            .map_err(|e| AgoraError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgoraError::Config(e.to_string()))
    }

    /// The database path with `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.database_path.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgoraResult<()> {
        let contents = format!(
            "\
# agora configuration

# Where the local event cache lives:
# database_path = \"{}\"

# Seconds to wait for the remote store before giving up:
# provider_timeout_secs = {}

# [remote]
# provider = \"{}\"
# collection = \"{}\"
",
            DEFAULT_DATABASE_PATH,
            DEFAULT_PROVIDER_TIMEOUT_SECS,
            DEFAULT_PROVIDER,
            DEFAULT_COLLECTION
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgoraError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgoraError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
