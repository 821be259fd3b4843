//! Shared command context: configuration, session location and the
//! collaborators built from them.

use std::path::PathBuf;
use std::sync::Arc;

use agora_core::config::AgoraConfig;
use agora_core::local::LocalCache;
use agora_core::reconciler::Reconciler;
use agora_core::remote::{OfflineStore, Provider, ProviderStore, RemoteStore};
use agora_core::session::Session;
use anyhow::Result;

pub struct App {
    pub config: AgoraConfig,
    pub session_path: PathBuf,
    pub offline: bool,
}

impl App {
    pub fn load(offline: bool) -> Result<Self> {
        Ok(App {
            config: AgoraConfig::load()?,
            session_path: Session::default_path()?,
            offline,
        })
    }

    pub fn require_session(&self) -> Result<Session> {
        Ok(Session::require(&self.session_path)?)
    }

    /// The identity provider is the same executable that serves documents.
    pub fn identity(&self) -> Provider {
        Provider::from_name(&self.config.remote.provider)
            .with_timeout(self.config.provider_timeout_secs)
    }

    fn remote(&self) -> Arc<dyn RemoteStore> {
        if self.offline {
            Arc::new(OfflineStore)
        } else {
            Arc::new(ProviderStore::from_settings(
                &self.config.remote,
                self.config.provider_timeout_secs,
            ))
        }
    }

    /// Open the cache and load it into a fresh reconciler.
    pub async fn reconciler(&self) -> Result<Reconciler> {
        let cache = LocalCache::open(&self.config.database_path()).await?;
        let mut reconciler = Reconciler::new(cache, self.remote());
        reconciler.activate().await?;
        Ok(reconciler)
    }
}
