//! Remote document store.
//!
//! The remote side is a flat collection of event documents with opaque ids.
//! It is reached either through a provider executable (`ProviderStore`) or,
//! for tests, an in-process `MemoryStore`. `OfflineStore` refuses every call.

pub mod document;
pub mod memory;
pub mod offline;
pub mod protocol;
pub mod provider;
pub mod store;

use async_trait::async_trait;

use crate::error::AgoraResult;
use crate::event::NaturalKey;

pub use document::{DocumentOutcome, EventDocument, InvalidReason, RemoteDocument, parse_document};
pub use memory::MemoryStore;
pub use offline::OfflineStore;
pub use provider::Provider;
pub use store::ProviderStore;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the whole collection.
    async fn list_documents(&self) -> AgoraResult<Vec<RemoteDocument>>;

    /// Add one document. Returns the id the store assigned to it.
    async fn add_document(&self, document: &EventDocument) -> AgoraResult<String>;

    /// Delete every document whose title and date match `key`.
    /// Returns how many documents were deleted.
    async fn delete_matching(&self, key: &NaturalKey) -> AgoraResult<usize>;
}
