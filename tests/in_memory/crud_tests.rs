//! Insert, fetch, delete, and listing behaviour of the in-memory store.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use super::helpers::{envelope, runtime, store};
use depot::store::adapters::memory::InMemoryMessageStore;
use depot::store::domain::{SurrogateId, Version};
use depot::store::ports::MessageStore;
use rstest::rstest;
use serde_json::json;
use std::collections::HashSet;
use std::io;
use tokio::runtime::Runtime;

#[rstest]
fn put_assigns_fresh_ids_and_version_zero(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");

    let first = rt.block_on(store.put(&envelope("hello"))).expect("put");
    let second = rt.block_on(store.put(&envelope("world"))).expect("put");

    let first_id = first.surrogate_id().expect("assigned id");
    let second_id = second.surrogate_id().expect("assigned id");
    assert_ne!(first_id, second_id);
    assert_eq!(first.version(), Some(Version::initial()));
    assert_eq!(second.version(), Some(Version::initial()));
}

#[rstest]
fn get_returns_submitted_payload_and_headers(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");
    let submitted = envelope("hello").with_header("priority", json!(3));

    let stored = rt.block_on(store.put(&submitted)).expect("put");
    let id = stored.surrogate_id().expect("assigned id");
    let fetched = rt.block_on(store.get(id)).expect("get").expect("present");

    assert_eq!(fetched.payload(), submitted.payload());
    assert_eq!(fetched.header("source"), submitted.header("source"));
    assert_eq!(fetched.header("priority"), Some(&json!(3)));
    assert_eq!(fetched.surrogate_id(), Some(id));
    assert_eq!(fetched.version(), Some(Version::initial()));
}

#[rstest]
fn get_missing_returns_none(runtime: io::Result<Runtime>, store: InMemoryMessageStore) {
    let rt = runtime.expect("tokio runtime");

    let result = rt
        .block_on(store.get(SurrogateId::new(404)))
        .expect("get should not error");

    assert!(result.is_none());
}

#[rstest]
fn delete_missing_returns_none_without_error(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");

    let result = rt
        .block_on(store.delete(SurrogateId::new(404)))
        .expect("delete should not error");

    assert!(result.is_none());
}

#[rstest]
fn delete_returns_pre_deletion_envelope(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");

    let stored = rt.block_on(store.put(&envelope("hello"))).expect("put");
    let id = stored.surrogate_id().expect("assigned id");

    let deleted = rt
        .block_on(store.delete(id))
        .expect("delete")
        .expect("present before deletion");
    assert_eq!(deleted.payload(), &json!("hello"));
    assert_eq!(deleted.surrogate_id(), Some(id));

    assert!(rt.block_on(store.get(id)).expect("get").is_none());
    assert!(
        rt.block_on(store.delete(id))
            .expect("second delete")
            .is_none()
    );
}

#[rstest]
fn list_returns_every_stored_envelope(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");
    for payload in ["a", "b", "c"] {
        rt.block_on(store.put(&envelope(payload))).expect("put");
    }

    let all = rt.block_on(store.list()).expect("list");

    assert_eq!(all.len(), 3);
    let payloads: HashSet<String> = all
        .iter()
        .filter_map(|env| env.payload().as_str().map(ToOwned::to_owned))
        .collect();
    assert_eq!(
        payloads,
        HashSet::from(["a".to_owned(), "b".to_owned(), "c".to_owned()])
    );
}

#[rstest]
fn round_trip_preserves_payload(runtime: io::Result<Runtime>, store: InMemoryMessageStore) {
    let rt = runtime.expect("tokio runtime");
    let submitted = envelope("round-trip").with_header("nested", json!({"a": [1, 2, 3]}));

    let id = rt
        .block_on(store.put(&submitted))
        .expect("put")
        .surrogate_id()
        .expect("assigned id");
    let fetched = rt.block_on(store.get(id)).expect("get").expect("present");

    assert_eq!(fetched.payload(), submitted.payload());
    assert_eq!(fetched.header("nested"), submitted.header("nested"));
}
