//! Index Module Tests
//!
//! ## Test Scopes
//! - **Builder**: full scan, gaps, per-comic failures, fatal max-ID failure.
//! - **Store**: point lookups, fail-forward rebuilds, refresh loop, and
//!   generation consistency under concurrent rebuilds.

#[cfg(test)]
mod tests {
    use crate::error::{Error, Result};
    use crate::index::{IndexBuilder, IndexGeneration, IndexStore};
    use crate::search::WordSearcher;
    use crate::storage::{Comic, ComicsStore, DbStats, MemoryStore};

    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Memory store with switchable failures.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        max_id_fails: AtomicBool,
        broken_ids: HashSet<u32>,
    }

    #[async_trait]
    impl WordSearcher for FlakyStore {
        async fn search_by_word(&self, word: &str) -> Result<Vec<u32>> {
            self.inner.search_by_word(word).await
        }

        async fn get_comics(&self, id: u32) -> Result<Comic> {
            if self.broken_ids.contains(&id) {
                return Err(Error::Storage(format!("row {} is corrupt", id)));
            }
            self.inner.get_comics(id).await
        }
    }

    #[async_trait]
    impl ComicsStore for FlakyStore {
        async fn add(&self, comic: Comic) -> Result<()> {
            self.inner.add(comic).await
        }

        async fn ids(&self) -> Result<Vec<u32>> {
            self.inner.ids().await
        }

        async fn stats(&self) -> Result<DbStats> {
            self.inner.stats().await
        }

        async fn max_id(&self) -> Result<u32> {
            if self.max_id_fails.load(Ordering::SeqCst) {
                return Err(Error::Storage("database is locked".to_string()));
            }
            self.inner.max_id().await
        }

        async fn drop_all(&self) -> Result<()> {
            self.inner.drop_all().await
        }
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add(Comic::new(1, "http://xkcd.com/1.png", ["hell", "word"])).await.unwrap();
        store.add(Comic::new(2, "http://xkcd.com/2.png", ["word", "run", "job"])).await.unwrap();
        store.add(Comic::new(3, "http://xkcd.com/3.png", ["hell", "job"])).await.unwrap();
        store
    }

    fn sorted(mut ids: Vec<u32>) -> Vec<u32> {
        ids.sort_unstable();
        ids
    }

    // ============================================================
    // BUILDER
    // ============================================================

    #[tokio::test]
    async fn test_build_index_full_scan() {
        // ARRANGE
        let store = seeded_store().await;
        let builder = IndexBuilder::new(Arc::new(store));

        // ACT
        let generation = builder.build_index().await.unwrap();

        // ASSERT: Scan order is ascending ID, so posting lists come out sorted
        let expected: HashMap<String, Vec<u32>> = HashMap::from([
            ("hell".to_string(), vec![1, 3]),
            ("word".to_string(), vec![1, 2]),
            ("run".to_string(), vec![2]),
            ("job".to_string(), vec![2, 3]),
        ]);
        assert_eq!(generation.index, expected);
        assert_eq!(generation.len(), 3);
        assert_eq!(generation.comic(2).unwrap().url, "http://xkcd.com/2.png");
    }

    #[tokio::test]
    async fn test_build_index_skips_gaps() {
        let store = MemoryStore::new();
        store.add(Comic::new(1, "u1", ["alpha"])).await.unwrap();
        store.add(Comic::new(4, "u4", ["alpha"])).await.unwrap();

        let generation = IndexBuilder::new(Arc::new(store)).build_index().await.unwrap();

        assert_eq!(generation.postings("alpha"), &[1, 4]);
        assert!(generation.comic(2).is_none());
    }

    #[tokio::test]
    async fn test_build_index_skips_unreadable_comics() {
        // ARRANGE: Comic 2 cannot be read
        let store = FlakyStore {
            inner: seeded_store().await,
            broken_ids: HashSet::from([2]),
            ..Default::default()
        };

        // ACT
        let generation = IndexBuilder::new(Arc::new(store)).build_index().await.unwrap();

        // ASSERT: Nothing points at the skipped comic
        assert!(generation.comic(2).is_none());
        assert_eq!(generation.postings("word"), &[1]);
        assert!(generation.postings("run").is_empty());
    }

    #[tokio::test]
    async fn test_build_index_fails_without_max_id() {
        let store = FlakyStore::default();
        store.max_id_fails.store(true, Ordering::SeqCst);

        let result = IndexBuilder::new(Arc::new(store)).build_index().await;

        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn test_build_index_empty_store() {
        let generation = IndexBuilder::new(Arc::new(MemoryStore::new()))
            .build_index()
            .await
            .unwrap();

        assert_eq!(generation, IndexGeneration::new());
    }

    // ============================================================
    // STORE
    // ============================================================

    #[tokio::test]
    async fn test_generation_lookups() {
        let mut generation = IndexGeneration::new();
        generation.insert(Comic::new(4, "u4", ["barrel"]));

        assert_eq!(generation.search_by_word("barrel").await.unwrap(), vec![4]);
        assert!(generation.search_by_word("tree").await.unwrap().is_empty());
        assert_eq!(generation.get_comics(4).await.unwrap().url, "u4");
        assert!(matches!(generation.get_comics(5).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_lookups_before_first_build_are_empty() {
        let index = IndexStore::new(
            IndexBuilder::new(Arc::new(seeded_store().await)),
            Duration::from_secs(60),
        );

        assert!(index.search_by_word("hell").await.unwrap().is_empty());
        assert!(matches!(index.get_comics(1).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_lookups_after_rebuild() {
        // ARRANGE
        let index = IndexStore::new(
            IndexBuilder::new(Arc::new(seeded_store().await)),
            Duration::from_secs(60),
        );

        // ACT
        index.rebuild().await.unwrap();

        // ASSERT
        assert_eq!(sorted(index.search_by_word("job").await.unwrap()), vec![2, 3]);
        assert!(index.search_by_word("unknown").await.unwrap().is_empty());
        assert_eq!(index.get_comics(3).await.unwrap().id, 3);
        assert!(matches!(index.get_comics(99).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_previous_generation() {
        // ARRANGE: A good first build
        let store = Arc::new(FlakyStore {
            inner: seeded_store().await,
            ..Default::default()
        });
        let index = IndexStore::new(IndexBuilder::new(store.clone()), Duration::from_secs(60));
        index.rebuild().await.unwrap();
        let before = index.snapshot();

        // ACT: The store starts failing
        store.max_id_fails.store(true, Ordering::SeqCst);
        let result = index.rebuild().await;

        // ASSERT: Old generation still served
        assert!(result.is_err());
        assert!(Arc::ptr_eq(&before, &index.snapshot()));
        assert_eq!(index.get_comics(1).await.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_start_builds_then_refreshes() {
        // ARRANGE
        let store = seeded_store().await;
        let index = IndexStore::new(
            IndexBuilder::new(Arc::new(store.clone())),
            Duration::from_millis(20),
        );
        let cancel = CancellationToken::new();

        // ACT: Initial build is done once start returns
        let refresher = index.clone().start(cancel.clone()).await;
        assert_eq!(index.snapshot().len(), 3);

        store.add(Comic::new(4, "u4", ["fresh"])).await.unwrap();

        // ASSERT: A later tick picks up the new comic
        let mut refreshed = false;
        for _ in 0..100 {
            if index.get_comics(4).await.is_ok() {
                refreshed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(refreshed);
        assert_eq!(index.search_by_word("fresh").await.unwrap(), vec![4]);

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), refresher)
            .await
            .expect("refresh loop stops on cancel")
            .unwrap();
    }

    #[tokio::test]
    async fn test_start_survives_failed_initial_build() {
        let store = Arc::new(FlakyStore {
            inner: seeded_store().await,
            ..Default::default()
        });
        store.max_id_fails.store(true, Ordering::SeqCst);
        let index = IndexStore::new(IndexBuilder::new(store.clone()), Duration::from_millis(20));
        let cancel = CancellationToken::new();

        let refresher = index.clone().start(cancel.clone()).await;
        assert!(index.snapshot().is_empty());

        store.max_id_fails.store(false, Ordering::SeqCst);
        let mut recovered = false;
        for _ in 0..100 {
            if !index.snapshot().is_empty() {
                recovered = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        cancel.cancel();
        refresher.await.unwrap();
        assert!(recovered);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_mixed_generations() {
        // ARRANGE: The store alternates between two disjoint comic sets
        let store = MemoryStore::new();
        let index = IndexStore::new(
            IndexBuilder::new(Arc::new(store.clone())),
            Duration::from_secs(60),
        );

        let writer = tokio::spawn({
            let index = index.clone();
            let store = store.clone();
            async move {
                for round in 0..50u32 {
                    store.drop_all().await.unwrap();
                    let base = if round % 2 == 0 { 1 } else { 10 };
                    for id in base..base + 5 {
                        store.add(Comic::new(id, "u", ["shared", "word"])).await.unwrap();
                    }
                    index.rebuild().await.unwrap();
                }
            }
        });

        // ACT: Readers check every snapshot while rebuilds run
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let index = index.clone();
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let generation = index.snapshot();
                        for ids in generation.index.values() {
                            for id in ids {
                                // ASSERT: Every posting resolves in the same generation
                                assert!(generation.comic(*id).is_some(), "dangling ID {}", id);
                            }
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
