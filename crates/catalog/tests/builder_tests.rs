//! Batch loading behaviour of the catalog builder against the mock upstream

mod common;

use common::{names, small_batches, starter_upstream};
use dexter_catalog::{BatchOutcome, CatalogBuilder};
use dexter_core::Error;
use dexter_upstream::MockResourceClient;
use futures::FutureExt;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_first_batch_loads_in_index_order() {
    let mock = starter_upstream();
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));

    let outcome = builder.load_next_batch().await.expect("batch loads");
    assert_eq!(
        outcome,
        BatchOutcome::Loaded {
            offset: 0,
            fetched: 3,
            added: 3,
            complete: false,
        }
    );

    let snapshot = builder.snapshot().await;
    assert_eq!(
        names(&snapshot.entities),
        vec!["bulbasaur", "ivysaur", "venusaur"]
    );
    assert_eq!(snapshot.next_offset, 3);
    assert!(!snapshot.complete);
}

#[tokio::test]
async fn test_joined_fields_are_populated() {
    let mock = starter_upstream();
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(10));
    builder.load_next_batch().await.expect("batch loads");

    let snapshot = builder.snapshot().await;
    let charmeleon = snapshot
        .entities
        .iter()
        .find(|e| e.name == "charmeleon")
        .expect("charmeleon loaded");
    assert_eq!(charmeleon.generation.as_deref(), Some("generation-i"));
    assert_eq!(charmeleon.types, Some(vec!["fire".to_string()]));
    assert_eq!(charmeleon.evolutions, vec!["charmander", "charizard"]);

    let tauros = snapshot
        .entities
        .iter()
        .find(|e| e.name == "tauros")
        .expect("tauros loaded");
    assert!(tauros.evolutions.is_empty());
}

#[tokio::test]
async fn test_short_batch_completes_catalog() {
    // 7 entries in batches of 3: offsets 0, 3, 6; the last holds one entry
    let mock = starter_upstream();
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));

    let batches = builder.load_remaining().await.expect("loads everything");
    assert_eq!(batches, 3);
    assert_eq!(mock.index_offsets(), vec![0, 3, 6]);

    let status = builder.status();
    assert_eq!(status.loaded, 7);
    assert!(status.complete);
    assert!(!status.loading);
}

#[tokio::test]
async fn test_exact_multiple_needs_one_empty_batch() {
    let mock = Arc::new(MockResourceClient::new());
    mock.add_many("mon", 6);
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));

    builder.load_remaining().await.expect("loads everything");

    assert_eq!(mock.index_offsets(), vec![0, 3, 6]);
    assert_eq!(builder.status().loaded, 6);
    assert!(builder.status().complete);
}

#[tokio::test]
async fn test_complete_catalog_issues_no_requests() {
    let mock = starter_upstream();
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(100));

    builder.load_next_batch().await.expect("single batch");
    assert!(builder.status().complete);
    let calls = mock.index_calls();
    let entity_calls = mock.entity_calls();

    for _ in 0..3 {
        let outcome = builder.load_next_batch().await.expect("no-op");
        assert_eq!(outcome, BatchOutcome::Complete);
    }
    assert_eq!(mock.index_calls(), calls);
    assert_eq!(mock.entity_calls(), entity_calls);
    assert_eq!(builder.load_remaining().await.expect("no-op"), 0);
}

#[tokio::test]
async fn test_concurrent_triggers_start_one_batch() {
    let mock = starter_upstream();
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));

    let (first, second) = tokio::join!(builder.load_next_batch(), builder.load_next_batch());

    let outcomes = [first.expect("first"), second.expect("second")];
    let loaded = outcomes
        .iter()
        .filter(|o| matches!(o, BatchOutcome::Loaded { .. }))
        .count();
    let ignored = outcomes
        .iter()
        .filter(|o| matches!(o, BatchOutcome::AlreadyLoading))
        .count();
    assert_eq!((loaded, ignored), (1, 1));
    assert_eq!(mock.index_offsets(), vec![0]);
    assert_eq!(builder.status().loaded, 3);
}

#[tokio::test]
async fn test_duplicates_across_batches_are_dropped() {
    let mock = Arc::new(MockResourceClient::new());
    mock.add_many("mon", 4);
    mock.push_duplicate_index_entry("mon-1");
    mock.push_duplicate_index_entry("mon-3");
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));

    builder.load_remaining().await.expect("loads everything");

    let snapshot = builder.snapshot().await;
    assert_eq!(
        names(&snapshot.entities),
        vec!["mon-0", "mon-1", "mon-2", "mon-3"]
    );
    let unique: HashSet<&str> = snapshot.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(unique.len(), snapshot.entities.len());
}

#[tokio::test]
async fn test_failed_join_discards_whole_batch() {
    let mock = starter_upstream();
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));
    builder.load_next_batch().await.expect("first batch");

    // charmeleon (id 5) sits in the second batch
    let charmeleon_url = MockResourceClient::detail_url(5);
    mock.fail_url(&charmeleon_url);

    let err = builder.load_next_batch().await.unwrap_err();
    match &err {
        Error::CatalogLoad { offset, source } => {
            assert_eq!(*offset, 3);
            assert!(
                matches!(&**source, Error::Join { entity, .. } if entity == "charmeleon"),
                "unexpected source: {source}"
            );
        }
        other => panic!("expected CatalogLoad, got {other}"),
    }

    let status = builder.status();
    assert_eq!(status.loaded, 3, "no partial merge");
    assert_eq!(status.next_offset, 3);
    assert!(!status.loading);

    mock.heal_url(&charmeleon_url);
    let outcome = builder.load_next_batch().await.expect("retry succeeds");
    assert!(matches!(
        outcome,
        BatchOutcome::Loaded {
            offset: 3,
            added: 3,
            ..
        }
    ));
    assert_eq!(mock.index_offsets(), vec![0, 3, 3]);
}

#[tokio::test]
async fn test_failed_index_page_reports_offset() {
    let mock = starter_upstream();
    mock.fail_index_offset(0);
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));

    let err = builder.load_next_batch().await.unwrap_err();
    match err {
        Error::CatalogLoad { offset, source } => {
            assert_eq!(offset, 0);
            assert!(matches!(
                *source,
                Error::Upstream {
                    status: Some(500),
                    ..
                }
            ));
        }
        other => panic!("expected CatalogLoad, got {other}"),
    }
    assert!(builder.snapshot().await.entities.is_empty());
    assert_eq!(mock.entity_calls(), 0);
}

#[tokio::test]
async fn test_dangling_index_entry_fails_batch() {
    let mock = Arc::new(MockResourceClient::new());
    mock.add_many("mon", 2);
    mock.push_dangling_index_entry("ghost");
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(10));

    let err = builder.load_next_batch().await.unwrap_err();
    assert!(matches!(err, Error::CatalogLoad { offset: 0, .. }));
    assert!(builder.snapshot().await.entities.is_empty());
}

#[tokio::test]
async fn test_abandoned_batch_releases_in_flight_flag() {
    let mock = starter_upstream();
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));

    // Polls once: the index request suspends, then the future is dropped
    assert!(builder.load_next_batch().now_or_never().is_none());
    assert!(!builder.is_loading());
    assert!(!builder.status().loading);
    assert!(builder.snapshot().await.entities.is_empty());

    let outcome = builder.load_next_batch().await.expect("next trigger runs");
    assert!(matches!(outcome, BatchOutcome::Loaded { offset: 0, .. }));
}

#[tokio::test]
async fn test_status_channel_reports_progress() {
    let mock = starter_upstream();
    let builder = CatalogBuilder::new(mock.clone(), &small_batches(3));
    let mut status_rx = builder.subscribe();

    builder.load_next_batch().await.expect("batch loads");

    assert!(status_rx.has_changed().expect("sender alive"));
    let status = *status_rx.borrow_and_update();
    assert_eq!(status.loaded, 3);
    assert_eq!(status.next_offset, 3);
    assert!(!status.loading);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_load_remaining_callers_share_the_work() {
    let mock = Arc::new(MockResourceClient::new());
    mock.add_many("mon", 20);
    let builder = Arc::new(CatalogBuilder::new(mock.clone(), &small_batches(3)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let builder = Arc::clone(&builder);
            tokio::spawn(async move { builder.load_remaining().await })
        })
        .collect();

    let mut total_batches = 0;
    for handle in handles {
        total_batches += handle.await.expect("task").expect("load");
    }

    // Each offset requested exactly once across all callers
    assert_eq!(total_batches, 7);
    assert_eq!(mock.index_offsets(), vec![0, 3, 6, 9, 12, 15, 18]);
    assert_eq!(builder.status().loaded, 20);
}

#[tokio::test]
async fn test_batch_runs_on_spawned_task() {
    let mock = starter_upstream();
    let builder = Arc::new(CatalogBuilder::new(mock.clone(), &small_batches(3)));

    let task = {
        let builder = Arc::clone(&builder);
        tokio::spawn(async move { builder.load_next_batch().await })
    };

    let outcome = task.await.expect("task joins").expect("batch loads");
    assert!(matches!(outcome, BatchOutcome::Loaded { offset: 0, added: 3, .. }));
    assert_eq!(builder.status().loaded, 3);
}
