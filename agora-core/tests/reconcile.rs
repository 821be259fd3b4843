use std::collections::HashSet;
use std::sync::Arc;

use agora_core::event::{Event, NaturalKey};
use agora_core::feed::HomeTab;
use agora_core::local::LocalCache;
use agora_core::reconciler::{Reconciler, RemoteWrite};
use agora_core::remote::{EventDocument, InvalidReason, MemoryStore, RemoteStore};
use chrono::NaiveDate;
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn concert() -> Event {
    Event::new("Concert", date(2025, 5, 31), "Arena")
}

fn fair() -> Event {
    Event::new("Fair", date(2025, 6, 10), "Square")
}

async fn setup(local: &[Event], remote: &[Event]) -> (Reconciler, Arc<MemoryStore>) {
    let cache = LocalCache::in_memory().await.unwrap();
    for event in local {
        cache.upsert(event).await.unwrap();
    }

    let store = Arc::new(MemoryStore::new());
    for event in remote {
        store.add_document(&EventDocument::from(event)).await.unwrap();
    }

    let mut reconciler = Reconciler::new(cache, store.clone());
    reconciler.activate().await.unwrap();
    (reconciler, store)
}

/// Compare events ignoring the local row id.
fn strip_ids(events: &[Event]) -> HashSet<(String, NaiveDate, String, bool)> {
    events
        .iter()
        .map(|e| (e.title.clone(), e.date, e.location.clone(), e.liked))
        .collect()
}

#[tokio::test]
async fn test_sync_keeps_local_copy_of_duplicate_and_adds_new() {
    let (mut reconciler, _store) =
        setup(&[concert()], &[concert().with_liked(true), fair()]).await;

    let report = reconciler.sync().await.unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.added.len(), 1);
    assert_eq!(report.added[0].key(), fair().key());

    assert_eq!(
        strip_ids(reconciler.all_events()),
        strip_ids(&[concert(), fair()])
    );
    let cached_concert = reconciler
        .local()
        .find(&concert().key())
        .await
        .unwrap()
        .unwrap();
    assert!(!cached_concert.liked);
    assert!(reconciler.liked_events().is_empty());
}

#[tokio::test]
async fn test_sync_result_is_union_by_natural_key() {
    let local = [
        concert(),
        Event::new("Gala", date(2025, 7, 1), "Hall").with_liked(true),
    ];
    let remote = [
        Event::new("Gala", date(2025, 7, 1), "Opera"),
        Event::new("Gala", date(2025, 7, 2), "Opera"),
        fair(),
    ];
    let (mut reconciler, _store) = setup(&local, &remote).await;

    reconciler.sync().await.unwrap();

    let local_keys: HashSet<NaturalKey> = local.iter().map(Event::key).collect();
    let mut expected: Vec<Event> = local.to_vec();
    expected.extend(remote.iter().filter(|r| !local_keys.contains(&r.key())).cloned());

    assert_eq!(strip_ids(reconciler.all_events()), strip_ids(&expected));
    assert_eq!(reconciler.all_events().len(), 4);
}

#[tokio::test]
async fn test_second_sync_inserts_nothing() {
    let (mut reconciler, _store) = setup(&[concert()], &[fair()]).await;

    let first = reconciler.sync().await.unwrap();
    assert_eq!(first.added.len(), 1);

    let second = reconciler.sync().await.unwrap();
    assert!(second.added.is_empty());
    assert!(second.is_empty());
    assert_eq!(second.duplicates, 1);
    assert_eq!(reconciler.local().list_all().await.unwrap().len(), 2);
    assert_eq!(reconciler.all_events().len(), 2);
}

#[tokio::test]
async fn test_invalid_documents_are_reported_not_cached() {
    let (mut reconciler, store) = setup(&[], &[fair()]).await;
    let missing_location = store.insert_raw(
        json!({ "title": "Expo", "date": "2025-08-01" })
            .as_object()
            .cloned()
            .unwrap(),
    );
    store.insert_raw(
        json!({ "title": "Expo", "date": "01/08/2025", "location": "Hall" })
            .as_object()
            .cloned()
            .unwrap(),
    );

    let report = reconciler.sync().await.unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(report.added.len(), 1);
    assert_eq!(report.invalid.len(), 2);
    assert!(report.invalid.iter().any(|i| i.id == missing_location
        && i.reason == InvalidReason::MissingField("location")));
    assert!(report
        .invalid
        .iter()
        .any(|i| matches!(&i.reason, InvalidReason::InvalidDate(d) if d == "01/08/2025")));
}

#[tokio::test]
async fn test_failed_fetch_leaves_feed_untouched() {
    let (mut reconciler, store) = setup(&[concert()], &[fair()]).await;
    store.set_unavailable(true);

    assert!(reconciler.sync().await.is_err());
    assert_eq!(strip_ids(reconciler.all_events()), strip_ids(&[concert()]));
}

#[tokio::test]
async fn test_liked_state_survives_round_trip_through_cache() {
    let (mut reconciler, _store) = setup(&[concert()], &[]).await;

    let updated = reconciler.set_liked(&concert().key(), true).await.unwrap();
    assert!(updated.liked);

    let cached = reconciler.local().list_all().await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].key(), concert().key());
    assert!(cached[0].liked);

    assert_eq!(reconciler.view(HomeTab::MyEvents).len(), 1);
}

#[tokio::test]
async fn test_toggle_like_twice_restores_views() {
    let (mut reconciler, _store) = setup(&[concert(), fair().with_liked(true)], &[]).await;
    let all_before = strip_ids(reconciler.all_events());
    let liked_before = strip_ids(reconciler.liked_events());

    let once = reconciler.toggle_like(&concert().key()).await.unwrap();
    assert!(once.liked);
    assert_eq!(reconciler.liked_events().len(), 2);

    let twice = reconciler.toggle_like(&concert().key()).await.unwrap();
    assert!(!twice.liked);

    assert_eq!(strip_ids(reconciler.all_events()), all_before);
    assert_eq!(strip_ids(reconciler.liked_events()), liked_before);
}

#[tokio::test]
async fn test_like_unknown_event_is_an_error() {
    let (mut reconciler, _store) = setup(&[], &[]).await;
    assert!(reconciler.toggle_like(&fair().key()).await.is_err());
}

#[tokio::test]
async fn test_delete_removes_everywhere_and_is_idempotent() {
    let (mut reconciler, store) = setup(&[concert().with_liked(true)], &[concert()]).await;

    let report = reconciler.delete(&concert().key()).await.unwrap();
    assert!(report.removed_locally);
    assert!(matches!(report.remote, RemoteWrite::Synced(1)));
    assert!(reconciler.all_events().is_empty());
    assert!(reconciler.liked_events().is_empty());
    assert!(store.documents().is_empty());

    let again = reconciler.delete(&concert().key()).await.unwrap();
    assert!(!again.removed_locally);
    assert!(matches!(again.remote, RemoteWrite::Synced(0)));
    assert!(reconciler.all_events().is_empty());
}

#[tokio::test]
async fn test_deleted_event_is_not_resurrected_by_sync() {
    let (mut reconciler, store) = setup(&[concert()], &[concert()]).await;

    store.set_unavailable(true);
    let report = reconciler.delete(&concert().key()).await.unwrap();
    assert!(matches!(report.remote, RemoteWrite::Failed(_)));
    assert_eq!(store.documents().len(), 1);
    store.set_unavailable(false);

    let sync = reconciler.sync().await.unwrap();
    assert!(sync.added.is_empty());
    assert!(!sync.is_empty());
    assert_eq!(sync.redeleted.len(), 1);
    assert!(sync.redeleted[0].1.is_synced());
    assert!(reconciler.all_events().is_empty());
    assert!(store.documents().is_empty());
}

#[tokio::test]
async fn test_add_event_publishes_and_clears_tombstone() {
    let (mut reconciler, store) = setup(&[concert()], &[]).await;
    reconciler.delete(&concert().key()).await.unwrap();

    let report = reconciler.add_event(concert()).await.unwrap();
    assert!(report.event.id.is_some());
    assert!(report.remote.is_synced());

    assert!(reconciler.local().tombstones().await.unwrap().is_empty());
    assert_eq!(reconciler.all_events().len(), 1);

    let documents = store.documents();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].fields.get("title"), Some(&json!("Concert")));
    assert_eq!(documents[0].fields.get("isLiked"), Some(&json!(false)));
}

#[tokio::test]
async fn test_add_event_keeps_local_copy_when_remote_fails() {
    let (mut reconciler, store) = setup(&[], &[]).await;
    store.set_unavailable(true);

    let report = reconciler.add_event(fair()).await.unwrap();
    assert!(matches!(report.remote, RemoteWrite::Failed(_)));
    assert_eq!(reconciler.local().list_all().await.unwrap().len(), 1);
    assert_eq!(reconciler.all_events().len(), 1);
}

#[tokio::test]
async fn test_file_backed_cache_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("events.db");

    {
        let cache = LocalCache::open(&path).await.unwrap();
        cache.upsert(&fair().with_liked(true)).await.unwrap();
    }

    let cache = LocalCache::open(&path).await.unwrap();
    let mut reconciler = Reconciler::new(cache, Arc::new(MemoryStore::new()));
    reconciler.activate().await.unwrap();

    assert_eq!(reconciler.liked_events().len(), 1);
    assert_eq!(reconciler.liked_events()[0].key(), fair().key());
}

#[tokio::test]
async fn test_delete_of_unknown_key_does_not_block_later_sync() {
    let (mut reconciler, store) = setup(&[], &[]).await;

    let report = reconciler.delete(&fair().key()).await.unwrap();
    assert!(!report.removed_locally);
    assert!(reconciler.local().tombstones().await.unwrap().is_empty());

    store.add_document(&EventDocument::from(&fair())).await.unwrap();
    let sync = reconciler.sync().await.unwrap();

    assert_eq!(sync.added.len(), 1);
    assert!(sync.redeleted.is_empty());
    assert_eq!(store.documents().len(), 1);
    assert_eq!(strip_ids(reconciler.all_events()), strip_ids(&[fair()]));
}

#[tokio::test]
async fn test_sync_adds_liked_remote_event_to_liked_view() {
    let remote = [
        fair().with_liked(true),
        Event::new("Gala", date(2025, 7, 1), "Hall"),
    ];
    let (mut reconciler, _store) = setup(&[concert()], &remote).await;

    let report = reconciler.sync().await.unwrap();
    assert_eq!(report.added.len(), 2);

    let expected: Vec<Event> = reconciler
        .all_events()
        .iter()
        .filter(|e| e.liked)
        .cloned()
        .collect();
    assert_eq!(strip_ids(reconciler.liked_events()), strip_ids(&expected));
    assert_eq!(
        strip_ids(reconciler.liked_events()),
        strip_ids(&[fair().with_liked(true)])
    );
    assert_eq!(reconciler.view(HomeTab::MyEvents).len(), 1);
}
