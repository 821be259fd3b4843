//! The signed-in session, persisted between runs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{Account, AuthMethod};
use crate::error::{AgoraError, AgoraResult};

const SESSION_FILE: &str = "session.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub account: Account,
    pub method: AuthMethod,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(account: Account, method: AuthMethod) -> Self {
        Session {
            account,
            method,
            signed_in_at: Utc::now(),
        }
    }

    /// ~/.local/share/agora/session.toml (platform data dir)
    pub fn default_path() -> AgoraResult<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| AgoraError::Config("Could not determine data directory".into()))?
            .join("agora");

        Ok(data_dir.join(SESSION_FILE))
    }

    pub fn load(path: &Path) -> AgoraResult<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let session =
            toml::from_str(&content).map_err(|e| AgoraError::Serialization(e.to_string()))?;
        Ok(Some(session))
    }

    /// Like `load`, but a missing session is an error.
    pub fn require(path: &Path) -> AgoraResult<Session> {
        Self::load(path)?.ok_or(AgoraError::NotSignedIn)
    }

    pub fn save(&self, path: &Path) -> AgoraResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| AgoraError::Serialization(e.to_string()))?;

        let temp = path.with_extension("toml.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, path)?;
        Ok(())
    }

    /// Remove the stored session. Returns whether one existed.
    pub fn clear(path: &Path) -> AgoraResult<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }
}
