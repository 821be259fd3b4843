//! In-process `RemoteStore`, used in tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{AgoraError, AgoraResult};
use crate::event::NaturalKey;
use crate::remote::RemoteStore;
use crate::remote::document::{EventDocument, RemoteDocument};

#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<RemoteDocument>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document with arbitrary fields, bypassing `EventDocument`.
    pub fn insert_raw(&self, fields: Map<String, Value>) -> String {
        let id = Uuid::new_v4().to_string();
        self.lock().push(RemoteDocument {
            id: id.clone(),
            fields,
        });
        id
    }

    pub fn documents(&self) -> Vec<RemoteDocument> {
        self.lock().clone()
    }

    /// While unavailable every call fails, like a store behind a dead network.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AgoraResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AgoraError::Provider("remote store unavailable".into()));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RemoteDocument>> {
        // Poisoning is ignored: no push or retain can leave the Vec half-updated.
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn matches_key(document: &RemoteDocument, key: &NaturalKey) -> bool {
    let date = key.date_string();
    document.fields.get("title").and_then(Value::as_str) == Some(key.title.as_str())
        && document.fields.get("date").and_then(Value::as_str) == Some(date.as_str())
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_documents(&self) -> AgoraResult<Vec<RemoteDocument>> {
        self.check_available()?;
        Ok(self.documents())
    }

    async fn add_document(&self, document: &EventDocument) -> AgoraResult<String> {
        self.check_available()?;
        Ok(self.insert_raw(document.clone().into_fields()))
    }

    async fn delete_matching(&self, key: &NaturalKey) -> AgoraResult<usize> {
        self.check_available()?;
        let mut documents = self.lock();
        let before = documents.len();
        documents.retain(|d| !matches_key(d, key));
        Ok(before - documents.len())
    }
}
