//! Reconciliation of the local cache with the remote document store.
//!
//! The reconciler owns the feed and is the only writer of the cache; every
//! mutating method takes `&mut self`, so a sync, a like and a delete can
//! never interleave. Events are matched across stores by natural key.
//!
//! Remote writes are attempted once. Their failures are returned as
//! `RemoteWrite::Failed` and nothing local is rolled back.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{AgoraError, AgoraResult};
use crate::event::{Event, NaturalKey};
use crate::feed::{EventFeed, HomeTab};
use crate::local::LocalCache;
use crate::remote::{DocumentOutcome, EventDocument, InvalidReason, RemoteStore, parse_document};

/// Outcome of a single write to the remote store.
#[derive(Debug)]
pub enum RemoteWrite<T> {
    Synced(T),
    Failed(AgoraError),
}

impl<T> RemoteWrite<T> {
    fn from_result(result: AgoraResult<T>, what: &str) -> Self {
        match result {
            Ok(value) => RemoteWrite::Synced(value),
            Err(e) => {
                tracing::warn!(error = %e, "remote {} failed", what);
                RemoteWrite::Failed(e)
            }
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, RemoteWrite::Synced(_))
    }
}

/// A remote document that could not be turned into an event.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidDocument {
    pub id: String,
    pub reason: InvalidReason,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    /// Documents returned by the remote store.
    pub fetched: usize,
    /// Events that were new and are now cached.
    pub added: Vec<Event>,
    /// Remote events whose natural key was already known locally.
    pub duplicates: usize,
    pub invalid: Vec<InvalidDocument>,
    /// Remote copies of locally deleted events, deleted again.
    pub redeleted: Vec<(NaturalKey, RemoteWrite<usize>)>,
}

impl SyncReport {
    /// Whether the sync changed or skipped nothing worth reporting.
    /// Duplicates alone do not count.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.invalid.is_empty() && self.redeleted.is_empty()
    }
}

#[derive(Debug)]
pub struct AddReport {
    pub event: Event,
    /// Id of the new remote document.
    pub remote: RemoteWrite<String>,
}

#[derive(Debug)]
pub struct DeleteReport {
    pub removed_locally: bool,
    /// Number of remote documents deleted.
    pub remote: RemoteWrite<usize>,
}

pub struct Reconciler {
    local: LocalCache,
    remote: Arc<dyn RemoteStore>,
    feed: EventFeed,
    active: bool,
}

impl Reconciler {
    pub fn new(local: LocalCache, remote: Arc<dyn RemoteStore>) -> Self {
        Reconciler {
            local,
            remote,
            feed: EventFeed::default(),
            active: false,
        }
    }

    pub fn local(&self) -> &LocalCache {
        &self.local
    }

    pub fn all_events(&self) -> &[Event] {
        self.feed.all()
    }

    pub fn liked_events(&self) -> &[Event] {
        self.feed.liked()
    }

    pub fn view(&self, tab: HomeTab) -> &[Event] {
        self.feed.view(tab)
    }

    /// Load the cached events into the feed.
    pub async fn activate(&mut self) -> AgoraResult<()> {
        let events = self.local.list_all().await?;
        tracing::debug!(count = events.len(), "loaded cached events");
        self.feed.load(events);
        self.active = true;
        Ok(())
    }

    async fn ensure_active(&mut self) -> AgoraResult<()> {
        if !self.active {
            self.activate().await?;
        }
        Ok(())
    }

    /// Fetch the remote collection and cache every event whose natural key is
    /// not known locally. Known keys are skipped even when location or liked
    /// state differ. A failed fetch leaves the feed untouched.
    pub async fn sync(&mut self) -> AgoraResult<SyncReport> {
        self.ensure_active().await?;

        let documents = self.remote.list_documents().await?;
        let tombstones = self.local.tombstones().await?;

        let mut report = SyncReport {
            fetched: documents.len(),
            ..SyncReport::default()
        };

        let mut known: HashSet<NaturalKey> = self.feed.all().iter().map(Event::key).collect();
        let mut candidates = Vec::new();
        let mut resurrected = HashSet::new();

        for document in &documents {
            match parse_document(document) {
                DocumentOutcome::Invalid { id, reason } => {
                    tracing::warn!(document = %id, %reason, "skipping remote document");
                    report.invalid.push(InvalidDocument { id, reason });
                }
                DocumentOutcome::Parsed(event) => {
                    let key = event.key();
                    if tombstones.contains(&key) {
                        resurrected.insert(key);
                    } else if known.insert(key) {
                        candidates.push(event);
                    } else {
                        report.duplicates += 1;
                    }
                }
            }
        }

        let added = self.local.insert_new(&candidates).await?;
        report.duplicates += candidates.len() - added.len();
        self.feed.append(&added);
        report.added = added;

        for key in resurrected {
            let result = self.remote.delete_matching(&key).await;
            report
                .redeleted
                .push((key, RemoteWrite::from_result(result, "delete")));
        }

        tracing::info!(
            fetched = report.fetched,
            added = report.added.len(),
            duplicates = report.duplicates,
            invalid = report.invalid.len(),
            "sync finished"
        );

        Ok(report)
    }

    /// Set the liked state of a known event. Liked state is local only.
    pub async fn set_liked(&mut self, key: &NaturalKey, liked: bool) -> AgoraResult<Event> {
        self.ensure_active().await?;

        let current = self
            .feed
            .get(key)
            .cloned()
            .ok_or_else(|| AgoraError::EventNotFound(key.clone()))?;

        let updated = self.local.upsert(&current.with_liked(liked)).await?;
        self.feed.upsert(updated.clone());
        Ok(updated)
    }

    /// Flip the liked state of a known event.
    pub async fn toggle_like(&mut self, key: &NaturalKey) -> AgoraResult<Event> {
        self.ensure_active().await?;

        let liked = self
            .feed
            .get(key)
            .map(|e| e.liked)
            .ok_or_else(|| AgoraError::EventNotFound(key.clone()))?;

        self.set_liked(key, !liked).await
    }

    /// Store a new event locally and publish it remotely. An event with the
    /// same natural key is replaced.
    pub async fn add_event(&mut self, event: Event) -> AgoraResult<AddReport> {
        self.ensure_active().await?;

        let key = event.key();
        self.local.clear_tombstone(&key).await?;
        let stored = self.local.upsert(&event).await?;
        self.feed.upsert(stored.clone());

        let result = self.remote.add_document(&EventDocument::from(&stored)).await;

        Ok(AddReport {
            event: stored,
            remote: RemoteWrite::from_result(result, "add"),
        })
    }

    /// Delete an event everywhere. Unknown keys leave local state untouched.
    ///
    /// Known keys get a tombstone so a sync that still sees the remote copy
    /// deletes it again instead of re-adding it.
    pub async fn delete(&mut self, key: &NaturalKey) -> AgoraResult<DeleteReport> {
        self.ensure_active().await?;

        let removed_locally = self.local.remove_by_key(key).await?;
        if removed_locally || self.feed.contains(key) {
            self.local.add_tombstone(key).await?;
        } else {
            tracing::debug!(%key, "delete of unknown event, no tombstone");
        }

        let result = self.remote.delete_matching(key).await;
        self.feed.remove(key);

        Ok(DeleteReport {
            removed_locally,
            remote: RemoteWrite::from_result(result, "delete"),
        })
    }
}
