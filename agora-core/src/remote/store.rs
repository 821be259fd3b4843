//! `RemoteStore` backed by a provider executable.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::RemoteSettings;
use crate::error::AgoraResult;
use crate::event::NaturalKey;
use crate::remote::RemoteStore;
use crate::remote::document::{EventDocument, RemoteDocument};
use crate::remote::protocol::{AddDocument, DeleteMatching, ListDocuments};
use crate::remote::provider::Provider;

#[derive(Clone, Debug)]
pub struct ProviderStore {
    provider: Provider,
    remote_config: Map<String, Value>,
}

impl ProviderStore {
    pub fn new(provider: Provider, remote_config: Map<String, Value>) -> Self {
        ProviderStore {
            provider,
            remote_config,
        }
    }

    pub fn from_settings(settings: &RemoteSettings, timeout_secs: u64) -> Self {
        let provider = Provider::from_name(&settings.provider).with_timeout(timeout_secs);
        ProviderStore::new(provider, settings.remote_config())
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

#[async_trait]
impl RemoteStore for ProviderStore {
    async fn list_documents(&self) -> AgoraResult<Vec<RemoteDocument>> {
        self.provider
            .call(ListDocuments {
                remote_config: self.remote_config.clone(),
            })
            .await
    }

    async fn add_document(&self, document: &EventDocument) -> AgoraResult<String> {
        self.provider
            .call(AddDocument {
                remote_config: self.remote_config.clone(),
                document: document.clone(),
            })
            .await
    }

    async fn delete_matching(&self, key: &NaturalKey) -> AgoraResult<usize> {
        self.provider
            .call(DeleteMatching {
                remote_config: self.remote_config.clone(),
                title: key.title.clone(),
                date: key.date_string(),
            })
            .await
    }
}
