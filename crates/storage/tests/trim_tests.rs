// Cache trimming: only prunable .dat artifacts go, the retained tree layer
// and non-.dat files stay, and the directory lock gates the whole operation.

mod common;

use common::{list_names, populate_cache, test_store};
use lode_core::{DataType, SectorId};
use lode_storage::StorageError;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn trim_removes_only_prunable_dat_files() {
    let ts = test_store(10).await;
    let dir = populate_cache(
        &ts,
        SectorId(1),
        &["a.dat", "b-data-tree-r-last.dat", "c.txt"],
    )
    .await;

    ts.store
        .trim_cache(&CancellationToken::new(), SectorId(1))
        .await
        .unwrap();

    assert_eq!(list_names(&dir).await, vec!["b-data-tree-r-last.dat", "c.txt"]);
}

#[tokio::test]
async fn trim_keeps_aux_files_and_last_layer_of_realistic_cache() {
    let ts = test_store(10).await;
    let dir = populate_cache(
        &ts,
        SectorId(2),
        &[
            "sc-02-data-layer-1.dat",
            "sc-02-data-layer-2.dat",
            "sc-02-data-tree-d.dat",
            "sc-02-data-tree-r-last.dat",
            "p_aux",
            "t_aux",
        ],
    )
    .await;

    ts.store
        .trim_cache(&CancellationToken::new(), SectorId(2))
        .await
        .unwrap();

    assert_eq!(
        list_names(&dir).await,
        vec!["p_aux", "sc-02-data-tree-r-last.dat", "t_aux"]
    );
}

#[tokio::test]
async fn trim_is_idempotent() {
    let ts = test_store(10).await;
    let dir = populate_cache(
        &ts,
        SectorId(3),
        &["a.dat", "b-data-tree-r-last.dat", "c.txt"],
    )
    .await;
    let ctx = CancellationToken::new();

    ts.store.trim_cache(&ctx, SectorId(3)).await.unwrap();
    let after_first = list_names(&dir).await;

    ts.store.trim_cache(&ctx, SectorId(3)).await.unwrap();
    assert_eq!(list_names(&dir).await, after_first);
}

#[tokio::test]
async fn trim_fails_without_the_lock_and_leaves_files_untouched() {
    let ts = test_store(10).await;
    let dir = populate_cache(&ts, SectorId(4), &["a.dat", "b.dat"]).await;
    let before = list_names(&dir).await;

    // Another owner holds the sector directory lock.
    let cache_path = ts
        .store
        .sector_path(DataType::Cache, SectorId(4))
        .await
        .unwrap();
    let guard = ts
        .store
        .lock_sector(&CancellationToken::new(), &cache_path)
        .await
        .unwrap();

    // A cancelled context fails the queued acquisition instead of blocking.
    let cancelled = CancellationToken::new();
    cancelled.cancel();
    match ts.store.trim_cache(&cancelled, SectorId(4)).await {
        Err(StorageError::LockCancelled { .. }) => {}
        other => panic!("expected lock cancellation, got {other:?}"),
    }

    assert_eq!(list_names(&dir).await, before);
    drop(guard);

    // With the lock released, the same trim goes through.
    ts.store
        .trim_cache(&CancellationToken::new(), SectorId(4))
        .await
        .unwrap();
    assert!(list_names(&dir).await.is_empty());
}

#[tokio::test]
async fn trim_aborts_on_deletion_failure_and_releases_the_lock() {
    let ts = test_store(10).await;
    let dir = populate_cache(
        &ts,
        SectorId(6),
        &["a.dat", "b-data-tree-r-last.dat", "c.txt"],
    )
    .await;

    // A directory with a prunable name: remove_file on it fails regardless
    // of process privileges, forcing the abort path.
    tokio::fs::create_dir(dir.join("blocker.dat")).await.unwrap();

    match ts
        .store
        .trim_cache(&CancellationToken::new(), SectorId(6))
        .await
    {
        Err(StorageError::Deletion { file, .. }) => assert_eq!(file, "blocker.dat"),
        other => panic!("expected deletion failure, got {other:?}"),
    }

    // The abort left the failing entry and everything after it in place.
    let names = list_names(&dir).await;
    assert!(names.contains(&"blocker.dat".to_string()));
    assert!(names.contains(&"b-data-tree-r-last.dat".to_string()));
    assert!(names.contains(&"c.txt".to_string()));

    // Retrying after the obstruction is gone must succeed immediately,
    // which also shows the lock was released on the error path.
    tokio::fs::remove_dir(dir.join("blocker.dat")).await.unwrap();
    ts.store
        .trim_cache(&CancellationToken::new(), SectorId(6))
        .await
        .unwrap();
    assert_eq!(list_names(&dir).await, vec!["b-data-tree-r-last.dat", "c.txt"]);
}

#[tokio::test]
async fn trim_fails_on_unresolved_sector() {
    let ts = test_store(10).await;

    match ts
        .store
        .trim_cache(&CancellationToken::new(), SectorId(99))
        .await
    {
        Err(StorageError::NotFound { kind, name }) => {
            assert_eq!(kind, DataType::Cache);
            assert_eq!(name, "s-t0101-99");
        }
        other => panic!("expected not found, got {other:?}"),
    }
}
