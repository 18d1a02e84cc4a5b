//! Version-guard success and conflict paths.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use super::helpers::{envelope, runtime, store};
use depot::store::adapters::memory::InMemoryMessageStore;
use depot::store::domain::{Envelope, Version};
use depot::store::error::StoreError;
use depot::store::ports::MessageStore;
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;

#[rstest]
fn update_returns_pre_increment_version_header(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");

    let stored = rt.block_on(store.put(&envelope("hello"))).expect("put");
    let id = stored.surrogate_id().expect("assigned id");

    let updated = rt.block_on(store.put(&stored)).expect("update");

    // The header keeps the version the writer read; the committed record is
    // one higher.
    assert_eq!(updated.version(), Some(Version::initial()));
    let fetched = rt.block_on(store.get(id)).expect("get").expect("present");
    assert_eq!(fetched.version(), Some(Version::new(1)));
}

#[rstest]
fn stale_version_fails_with_conflict_details(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");

    let stored = rt.block_on(store.put(&envelope("hello"))).expect("put");
    let id = stored.surrogate_id().expect("assigned id");

    rt.block_on(store.put(&stored)).expect("first update wins");

    let result = rt.block_on(store.put(&stored));
    match result {
        Err(StoreError::OptimisticLockConflict {
            id: conflict_id,
            expected,
            observed,
        }) => {
            assert_eq!(conflict_id, id);
            assert_eq!(expected, Version::initial());
            assert_eq!(observed, Some(Version::new(1)));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[rstest]
fn conflict_leaves_stored_state_untouched(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");

    let stored = rt.block_on(store.put(&envelope("hello"))).expect("put");
    let id = stored.surrogate_id().expect("assigned id");

    let fresh = Envelope::new(json!("hello2")).with_identity(id, Version::initial());
    rt.block_on(store.put(&fresh)).expect("first update wins");

    let stale = Envelope::new(json!("hello3")).with_identity(id, Version::initial());
    rt.block_on(store.put(&stale)).expect_err("stale update");

    let current = rt.block_on(store.get(id)).expect("get").expect("present");
    assert_eq!(current.payload(), &json!("hello2"));
    assert_eq!(current.version(), Some(Version::new(1)));
}

#[rstest]
fn versions_climb_by_one_per_successful_update(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");

    let mut current = rt.block_on(store.put(&envelope("hello"))).expect("put");
    let id = current.surrogate_id().expect("assigned id");

    for round in 0..3 {
        assert_eq!(current.version(), Some(Version::new(round)));
        rt.block_on(store.put(&current)).expect("update");
        current = rt.block_on(store.get(id)).expect("get").expect("present");
    }

    assert_eq!(current.version(), Some(Version::new(3)));
}

#[rstest]
fn racing_stale_writers_produce_exactly_one_winner(
    runtime: io::Result<Runtime>,
    store: InMemoryMessageStore,
) {
    let rt = runtime.expect("tokio runtime");

    let stored = rt.block_on(store.put(&envelope("contested"))).expect("put");

    let outcomes: Vec<_> = (0..4)
        .map(|_| rt.block_on(store.put(&stored)))
        .collect();

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|outcome| {
            matches!(
                outcome,
                Err(StoreError::OptimisticLockConflict { .. })
            )
        })
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 3);
}
