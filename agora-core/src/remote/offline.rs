//! `RemoteStore` for `--offline` runs: nothing is sent, every call fails
//! with `AgoraError::Offline`.

use async_trait::async_trait;

use crate::error::{AgoraError, AgoraResult};
use crate::event::NaturalKey;
use crate::remote::RemoteStore;
use crate::remote::document::{EventDocument, RemoteDocument};

#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineStore;

#[async_trait]
impl RemoteStore for OfflineStore {
    async fn list_documents(&self) -> AgoraResult<Vec<RemoteDocument>> {
        Err(AgoraError::Offline)
    }

    async fn add_document(&self, _document: &EventDocument) -> AgoraResult<String> {
        Err(AgoraError::Offline)
    }

    async fn delete_matching(&self, _key: &NaturalKey) -> AgoraResult<usize> {
        Err(AgoraError::Offline)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::event::Event;
    use crate::local::LocalCache;
    use crate::reconciler::{Reconciler, RemoteWrite};

    fn fair() -> Event {
        Event::new(
            "Fair",
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            "Square",
        )
    }

    #[tokio::test]
    async fn test_offline_add_is_reported_as_not_synced() {
        let cache = LocalCache::in_memory().await.unwrap();
        let mut reconciler = Reconciler::new(cache, Arc::new(OfflineStore));

        let report = reconciler.add_event(fair()).await.unwrap();

        assert!(matches!(report.remote, RemoteWrite::Failed(AgoraError::Offline)));
        assert_eq!(reconciler.local().list_all().await.unwrap().len(), 1);
        assert_eq!(reconciler.all_events().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_delete_keeps_tombstone_for_replay() {
        let cache = LocalCache::in_memory().await.unwrap();
        cache.upsert(&fair()).await.unwrap();
        let mut reconciler = Reconciler::new(cache, Arc::new(OfflineStore));

        let report = reconciler.delete(&fair().key()).await.unwrap();

        assert!(report.removed_locally);
        assert!(!report.remote.is_synced());
        assert!(
            reconciler
                .local()
                .tombstones()
                .await
                .unwrap()
                .contains(&fair().key())
        );
    }

    #[tokio::test]
    async fn test_offline_sync_fails() {
        let cache = LocalCache::in_memory().await.unwrap();
        let mut reconciler = Reconciler::new(cache, Arc::new(OfflineStore));
        assert!(matches!(reconciler.sync().await, Err(AgoraError::Offline)));
    }
}
