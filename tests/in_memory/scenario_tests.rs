//! End-to-end walkthrough of the store lifecycle.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use super::helpers::runtime;
use depot::store::adapters::memory::InMemoryMessageStore;
use depot::store::domain::{Envelope, SurrogateId, Version};
use depot::store::error::StoreError;
use depot::store::ports::MessageStore;
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;

/// Walks the store through the canonical insert/tag/update/conflict script.
#[rstest]
fn insert_tag_update_and_stale_retry(runtime: io::Result<Runtime>) {
    let rt = runtime.expect("tokio runtime");
    let store = InMemoryMessageStore::new();

    // put "hello" with no correlation token.
    let hello = rt
        .block_on(store.put(&Envelope::new(json!("hello"))))
        .expect("put hello");
    assert_eq!(hello.surrogate_id(), Some(SurrogateId::new(1)));
    assert_eq!(hello.version(), Some(Version::initial()));

    // put "world" tagged order-42.
    let world = rt
        .block_on(store.put(
            &Envelope::new(json!("world")).with_correlation_token(json!("order-42")),
        ))
        .expect("put world");
    assert_eq!(world.surrogate_id(), Some(SurrogateId::new(2)));
    assert_eq!(world.version(), Some(Version::initial()));

    let group = rt
        .block_on(store.list_by_correlation(&json!("order-42")))
        .expect("list group");
    assert_eq!(group.len(), 1);
    assert_eq!(
        group.first().expect("group member").payload(),
        &json!("world")
    );

    // Re-submit id=1 with version 0 and a changed payload: succeeds, stored
    // version becomes 1.
    let revised = Envelope::new(json!("hello2"))
        .with_identity(SurrogateId::new(1), Version::initial());
    rt.block_on(store.put(&revised)).expect("update hello");
    let stored = rt
        .block_on(store.get(SurrogateId::new(1)))
        .expect("get")
        .expect("present");
    assert_eq!(stored.payload(), &json!("hello2"));
    assert_eq!(stored.version(), Some(Version::new(1)));

    // Re-submit the same stale version: conflict.
    let stale = rt.block_on(store.put(&revised));
    assert!(matches!(
        stale,
        Err(StoreError::OptimisticLockConflict { .. })
    ));
}
