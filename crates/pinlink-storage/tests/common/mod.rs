//! Behaviour every link store must share, run against each backend.

#![allow(dead_code)]

use jiff::{SignedDuration, Timestamp};
use pinlink_core::Slug;
use pinlink_storage::{CreateOutcome, LinkAdmin, LinkStore};
use std::sync::Arc;

pub fn slug(value: &str) -> Slug {
    Slug::new_unchecked(value)
}

pub async fn create_then_fetch<S: LinkAdmin>(store: &S) {
    let outcome = store
        .try_create(&slug("abc123"), "https://example.com/page")
        .await
        .unwrap();
    let CreateOutcome::Created(created) = outcome else {
        panic!("expected a fresh record, got {outcome:?}");
    };

    let fetched = store.fetch(&slug("abc123")).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.target_url, "https://example.com/page");
    assert_eq!(fetched.visit_count, 0);
    assert!(!fetched.pinned);
    assert_eq!(fetched.expires_at, None);
}

pub async fn fetch_absent<S: LinkAdmin>(store: &S) {
    assert!(store.fetch(&slug("missing")).await.unwrap().is_none());
}

pub async fn duplicate_create_reports_existing<S: LinkAdmin>(store: &S) {
    store
        .try_create(&slug("taken"), "https://one.example")
        .await
        .unwrap();
    let outcome = store
        .try_create(&slug("taken"), "https://two.example")
        .await
        .unwrap();
    assert_eq!(outcome, CreateOutcome::AlreadyExists);

    let fetched = store.fetch(&slug("taken")).await.unwrap().unwrap();
    assert_eq!(fetched.target_url, "https://one.example");
}

pub async fn slugs_are_case_sensitive<S: LinkAdmin>(store: &S) {
    store.try_create(&slug("MixCase"), "https://upper.example").await.unwrap();
    let outcome = store
        .try_create(&slug("mixcase"), "https://lower.example")
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Created(_)));
}

pub async fn concurrent_creates_admit_one_winner<S: LinkAdmin>(store: Arc<S>) {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .try_create(&slug("contested"), &format!("https://example{i}.com"))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        if matches!(handle.await.unwrap(), CreateOutcome::Created(_)) {
            created += 1;
        }
    }
    assert_eq!(created, 1);
}

pub async fn increments_count_once_each<S: LinkAdmin>(store: &S) {
    store.try_create(&slug("counted"), "https://example.com").await.unwrap();
    for _ in 0..3 {
        store.increment_visits(&slug("counted")).await.unwrap();
    }
    let record = store.fetch(&slug("counted")).await.unwrap().unwrap();
    assert_eq!(record.visit_count, 3);
}

pub async fn increment_absent_is_noop<S: LinkAdmin>(store: &S) {
    store.increment_visits(&slug("ghost")).await.unwrap();
    assert!(store.fetch(&slug("ghost")).await.unwrap().is_none());
}

pub async fn expiration_round_trips<S: LinkAdmin>(store: &S) {
    store.try_create(&slug("timed"), "https://example.com").await.unwrap();
    let at = Timestamp::from_millisecond(Timestamp::now().as_millisecond()).unwrap()
        + SignedDuration::from_hours(1);

    assert!(store.set_expiration(&slug("timed"), Some(at)).await.unwrap());
    let record = store.fetch(&slug("timed")).await.unwrap().unwrap();
    assert_eq!(record.expires_at, Some(at));

    assert!(store.set_expiration(&slug("timed"), None).await.unwrap());
    let record = store.fetch(&slug("timed")).await.unwrap().unwrap();
    assert_eq!(record.expires_at, None);
}

pub async fn expiration_drops_sub_millisecond_precision<S: LinkAdmin>(store: &S) {
    store.try_create(&slug("precise"), "https://example.com").await.unwrap();
    let whole = Timestamp::from_millisecond(1_800_000_000_123).unwrap();

    store
        .set_expiration(&slug("precise"), Some(whole + SignedDuration::from_nanos(999_999)))
        .await
        .unwrap();
    let record = store.fetch(&slug("precise")).await.unwrap().unwrap();
    assert_eq!(record.expires_at, Some(whole));
}

pub async fn expired_records_are_still_fetched<S: LinkAdmin>(store: &S) {
    store.try_create(&slug("lapsed"), "https://example.com").await.unwrap();
    let past = Timestamp::now() - SignedDuration::from_millis(1);
    store.set_expiration(&slug("lapsed"), Some(past)).await.unwrap();

    let record = store.fetch(&slug("lapsed")).await.unwrap().unwrap();
    assert!(record.is_expired());
}

pub async fn pinned_listing_filters_and_orders<S: LinkAdmin>(store: &S) {
    for s in ["pin-b", "pin-a", "pin-old", "plain"] {
        store.try_create(&slug(s), &format!("https://example.com/{s}")).await.unwrap();
    }
    for s in ["pin-b", "pin-a", "pin-old"] {
        assert!(store.set_pinned(&slug(s), true).await.unwrap());
    }
    store
        .set_expiration(&slug("pin-old"), Some(Timestamp::now() - SignedDuration::from_secs(1)))
        .await
        .unwrap();
    store
        .set_expiration(&slug("pin-b"), Some(Timestamp::now() + SignedDuration::from_hours(1)))
        .await
        .unwrap();

    let listed: Vec<_> = store
        .list_pinned_active()
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.slug.into_string(), r.target_url, r.pinned))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("pin-a".to_string(), "https://example.com/pin-a".to_string(), true),
            ("pin-b".to_string(), "https://example.com/pin-b".to_string(), true),
        ]
    );

    assert!(store.set_pinned(&slug("pin-a"), false).await.unwrap());
    let listed = store.list_pinned_active().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].slug.as_str(), "pin-b");
}

pub async fn empty_pinned_listing<S: LinkAdmin>(store: &S) {
    assert!(store.list_pinned_active().await.unwrap().is_empty());
}

pub async fn admin_on_absent_slug<S: LinkAdmin>(store: &S) {
    assert!(!store.set_pinned(&slug("ghost"), true).await.unwrap());
    assert!(!store.set_expiration(&slug("ghost"), None).await.unwrap());
    assert!(store.fetch(&slug("ghost")).await.unwrap().is_none());
}

pub async fn repinning_is_idempotent<S: LinkAdmin>(store: &S) {
    store.try_create(&slug("twice"), "https://example.com").await.unwrap();
    assert!(store.set_pinned(&slug("twice"), true).await.unwrap());
    assert!(store.set_pinned(&slug("twice"), true).await.unwrap());
    assert_eq!(store.list_pinned_active().await.unwrap().len(), 1);
}
