mod common;

use pinlink_storage::InMemoryLinkStore;
use std::sync::Arc;

#[tokio::test]
async fn create_then_fetch() {
    common::create_then_fetch(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn fetch_absent() {
    common::fetch_absent(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn duplicate_create_reports_existing() {
    common::duplicate_create_reports_existing(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn slugs_are_case_sensitive() {
    common::slugs_are_case_sensitive(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn concurrent_creates_admit_one_winner() {
    common::concurrent_creates_admit_one_winner(Arc::new(InMemoryLinkStore::new())).await;
}

#[tokio::test]
async fn increments_count_once_each() {
    common::increments_count_once_each(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn increment_absent_is_noop() {
    common::increment_absent_is_noop(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn expiration_round_trips() {
    common::expiration_round_trips(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn expiration_drops_sub_millisecond_precision() {
    common::expiration_drops_sub_millisecond_precision(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn expired_records_are_still_fetched() {
    common::expired_records_are_still_fetched(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn pinned_listing_filters_and_orders() {
    common::pinned_listing_filters_and_orders(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn empty_pinned_listing() {
    common::empty_pinned_listing(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn admin_on_absent_slug() {
    common::admin_on_absent_slug(&InMemoryLinkStore::new()).await;
}

#[tokio::test]
async fn repinning_is_idempotent() {
    common::repinning_is_idempotent(&InMemoryLinkStore::new()).await;
}
