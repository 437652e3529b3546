//! The in-memory record arena and its linear search.

use super::{cosine_similarity, read_snapshot, write_snapshot, SearchResult, VectorRecord};
use crate::chunking::TextChunk;
use crate::embedding::Embedder;
use crate::error::{QaError, Result};
use crate::progress::{ProgressEvent, ProgressSink, TracingProgress};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default number of embedding requests in flight during `add_chunks`.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// In-memory vector store.
///
/// Mutating operations take `&mut self`; share the store behind an `Arc`
/// once ingestion or loading is finished and search concurrently.
pub struct VectorStore {
    embedder: Arc<dyn Embedder>,
    records: Vec<VectorRecord>,
    max_concurrent: usize,
    progress: Arc<dyn ProgressSink>,
}

impl VectorStore {
    /// Create an empty store using `embedder` for chunks and queries.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            records: Vec::new(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            progress: Arc::new(TracingProgress),
        }
    }

    /// Limit concurrent embedding requests while adding chunks.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Report progress to `progress` instead of the log.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Length every stored embedding must have.
    pub fn dimensions(&self) -> usize {
        self.embedder.dimensions()
    }

    /// Drop all records.
    pub fn initialize(&mut self) {
        self.records.clear();
        self.progress.emit(&ProgressEvent::StoreInitialized);
    }

    /// Embed `chunks` and append them in input order.
    ///
    /// If any embedding fails, nothing from this batch is added; records from
    /// earlier calls are kept.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn add_chunks(&mut self, chunks: Vec<TextChunk>) -> Result<usize> {
        let total = chunks.len();
        if total == 0 {
            return Ok(0);
        }

        self.progress.emit(&ProgressEvent::EmbeddingStarted { total });

        let embedder = Arc::clone(&self.embedder);
        let progress = Arc::clone(&self.progress);
        let done = AtomicUsize::new(0);

        // `buffered` yields in input order regardless of completion order
        let embeddings: Vec<Vec<f32>> = stream::iter(chunks.iter())
            .map(|chunk| {
                let embedder = &embedder;
                let progress = &progress;
                let done = &done;
                async move {
                    let embedding = embedder.embed(chunk.content()).await.map_err(|e| {
                        QaError::EmbeddingGeneration {
                            source_id: chunk.source_id().to_string(),
                            chunk_index: chunk.chunk_index(),
                            source: Box::new(e),
                        }
                    })?;
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    progress.emit(&ProgressEvent::ChunkEmbedded {
                        done: finished,
                        total,
                    });
                    Ok::<_, QaError>(embedding)
                }
            })
            .buffered(self.max_concurrent)
            .try_collect()
            .await?;

        let expected = self.dimensions();
        if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
            return Err(QaError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        self.records.extend(
            chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| VectorRecord::new(chunk, embedding)),
        );

        self.progress.emit(&ProgressEvent::ChunksAdded { count: total });
        Ok(total)
    }

    /// Find the `top_k` records most similar to `query`.
    ///
    /// An empty store yields no results without calling the embedder.
    #[instrument(skip(self), fields(records = self.records.len()))]
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult<'_>>> {
        if self.records.is_empty() {
            self.progress.emit(&ProgressEvent::EmptyStore);
            return Ok(Vec::new());
        }

        self.progress.emit(&ProgressEvent::Searching {
            records: self.records.len(),
        });

        let query_embedding = self.embedder.embed(query).await?;
        self.search_by_embedding(&query_embedding, top_k)
    }

    /// Rank every record against a precomputed query embedding.
    ///
    /// Ties keep insertion order.
    pub fn search_by_embedding(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult<'_>>> {
        let mut scored = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| Ok((i, cosine_similarity(query_embedding, record.embedding())?)))
            .collect::<Result<Vec<(usize, f32)>>>()?;

        // Stable sort, descending
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        debug!("Returning {} of {} records", scored.len(), self.records.len());

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(position, (i, score))| SearchResult {
                chunk: self.records[i].chunk(),
                score,
                rank: position + 1,
            })
            .collect())
    }

    /// Snapshot all records to `dir/vectordb.json`.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = write_snapshot(dir, &self.records)?;
        self.progress.emit(&ProgressEvent::SnapshotSaved {
            path: path.clone(),
            records: self.records.len(),
        });
        Ok(path)
    }

    /// Replace all records with the snapshot in `dir`.
    pub fn load(&mut self, dir: &Path) -> Result<usize> {
        self.records = read_snapshot(dir)?;
        self.progress.emit(&ProgressEvent::SnapshotLoaded {
            path: super::snapshot_path(dir),
            records: self.records.len(),
        });
        Ok(self.records.len())
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{chunk, RecordingProgress, StubEmbedder};

    fn store_with(embedder: StubEmbedder) -> VectorStore {
        VectorStore::new(Arc::new(embedder))
    }

    #[tokio::test]
    async fn test_empty_store_search_returns_nothing() {
        let embedder = Arc::new(StubEmbedder::new(2));
        let progress = Arc::new(RecordingProgress::default());
        let store = VectorStore::new(embedder.clone()).with_progress(progress.clone());

        let results = store.search("anything", 4).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(embedder.calls(), 0);
        assert_eq!(progress.events(), vec![ProgressEvent::EmptyStore]);
    }

    #[tokio::test]
    async fn test_mammal_example() {
        let embedder = StubEmbedder::new(2)
            .with("cats are mammals", vec![0.9, 0.435_889_9])
            .with("dogs are mammals", vec![0.8, 0.6])
            .with("what is a mammal", vec![1.0, 0.0]);
        let mut store = store_with(embedder);
        store
            .add_chunks(vec![
                chunk("cats are mammals", "A", 0),
                chunk("dogs are mammals", "B", 0),
            ])
            .await
            .unwrap();

        let results = store.search("what is a mammal", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.source_id(), "A");
        assert_eq!(results[0].rank, 1);
        assert!((results[0].score - 0.9).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_results_sorted_and_ties_keep_insertion_order() {
        let embedder = StubEmbedder::new(2)
            .with("low", vec![0.0, 1.0])
            .with("tie-first", vec![1.0, 1.0])
            .with("best", vec![1.0, 0.0])
            .with("tie-second", vec![2.0, 2.0])
            .with("q", vec![1.0, 0.0]);
        let mut store = store_with(embedder);
        store
            .add_chunks(vec![
                chunk("low", "s", 0),
                chunk("tie-first", "s", 1),
                chunk("best", "s", 2),
                chunk("tie-second", "s", 3),
            ])
            .await
            .unwrap();

        let results = store.search("q", 10).await.unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.chunk.content()).collect();

        assert_eq!(order, vec!["best", "tie-first", "tie-second", "low"]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_non_finite_embeddings_do_not_break_ranking() {
        let embedder = StubEmbedder::new(2)
            .with("orthogonal", vec![0.0, 1.0])
            .with("broken", vec![f32::NAN, 0.0])
            .with("aligned", vec![1.0, 0.0])
            .with("huge", vec![f32::INFINITY, 1.0]);
        let mut store = store_with(embedder);
        store
            .add_chunks(vec![
                chunk("orthogonal", "s", 0),
                chunk("broken", "s", 1),
                chunk("aligned", "s", 2),
                chunk("huge", "s", 3),
            ])
            .await
            .unwrap();

        let results = store.search_by_embedding(&[1.0, 0.0], 10).unwrap();

        assert_eq!(results.len(), 4);
        let finite: Vec<&str> = results
            .iter()
            .filter(|r| r.score.is_finite())
            .map(|r| r.chunk.content())
            .collect();
        assert_eq!(finite, vec!["aligned", "orthogonal"]);
        let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_top_k_bounds_result_count() {
        let mut embedder = StubEmbedder::new(2).with("q", vec![1.0, 0.5]);
        let mut chunks = Vec::new();
        for i in 0..5 {
            let text = format!("chunk {}", i);
            embedder = embedder.with(&text, vec![1.0, i as f32]);
            chunks.push(chunk(&text, "s", i));
        }
        let mut store = store_with(embedder);
        store.add_chunks(chunks).await.unwrap();

        for (top_k, expected) in [(0, 0), (1, 1), (3, 3), (5, 5), (9, 5)] {
            assert_eq!(store.search("q", top_k).await.unwrap().len(), expected);
        }
    }

    #[tokio::test]
    async fn test_concurrent_embedding_preserves_input_order() {
        let embedder = StubEmbedder::new(1)
            .with("slow", vec![1.0])
            .with("medium", vec![2.0])
            .with("fast", vec![3.0])
            .delayed("slow", 60)
            .delayed("medium", 30);
        let mut store = store_with(embedder).with_max_concurrent(3);

        store
            .add_chunks(vec![
                chunk("slow", "s", 0),
                chunk("medium", "s", 1),
                chunk("fast", "s", 2),
            ])
            .await
            .unwrap();

        let stored: Vec<(&str, f32)> = store
            .records()
            .iter()
            .map(|r| (r.chunk().content(), r.embedding()[0]))
            .collect();
        assert_eq!(stored, vec![("slow", 1.0), ("medium", 2.0), ("fast", 3.0)]);
    }

    #[tokio::test]
    async fn test_failed_batch_keeps_earlier_records() {
        let embedder = StubEmbedder::new(2)
            .with("one", vec![1.0, 0.0])
            .with("two", vec![0.0, 1.0]);
        let mut store = store_with(embedder);
        store.add_chunks(vec![chunk("one", "s", 0)]).await.unwrap();

        let err = store
            .add_chunks(vec![chunk("two", "s", 1), chunk("unknown", "s", 2)])
            .await
            .unwrap_err();

        match err {
            QaError::EmbeddingGeneration {
                source_id,
                chunk_index,
                source,
            } => {
                assert_eq!(source_id, "s");
                assert_eq!(chunk_index, 2);
                assert!(matches!(*source, QaError::Provider { status: Some(500), .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.count(), 1);
        assert_eq!(store.records()[0].chunk().content(), "one");
    }

    #[tokio::test]
    async fn test_wrong_embedding_length_rejected_on_add() {
        let embedder = StubEmbedder::new(3).with("short", vec![1.0, 0.0]);
        let mut store = store_with(embedder);

        let err = store.add_chunks(vec![chunk("short", "s", 0)]).await.unwrap_err();

        assert!(matches!(
            err,
            QaError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch_is_an_error() {
        let embedder = StubEmbedder::new(2)
            .with("doc", vec![1.0, 0.0])
            .with("q", vec![1.0, 0.0, 0.0]);
        let mut store = store_with(embedder);
        store.add_chunks(vec![chunk("doc", "s", 0)]).await.unwrap();

        assert!(matches!(
            store.search("q", 4).await,
            Err(QaError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let embedder = Arc::new(
            StubEmbedder::new(3)
                .with("alpha", vec![0.123_456_78, -1.0, 3.5e-8])
                .with("beta", vec![1.0, 2.0, 3.0]),
        );
        let mut store = VectorStore::new(embedder.clone());
        store
            .add_chunks(vec![chunk("alpha", "vid1", 0), chunk("beta", "vid2", 0)])
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = store.save(&dir.path().join("db")).unwrap();
        assert!(path.ends_with("vectordb.json"));

        let mut restored = VectorStore::new(embedder);
        restored.load(&dir.path().join("db")).unwrap();

        assert_eq!(restored.count(), 2);
        assert_eq!(restored.records(), store.records());
    }

    #[tokio::test]
    async fn test_load_replaces_records_wholesale() {
        let embedder = Arc::new(
            StubEmbedder::new(1)
                .with("saved", vec![1.0])
                .with("transient", vec![2.0]),
        );
        let dir = tempfile::tempdir().unwrap();

        let mut store = VectorStore::new(embedder.clone());
        store.add_chunks(vec![chunk("saved", "s", 0)]).await.unwrap();
        store.save(dir.path()).unwrap();

        store.add_chunks(vec![chunk("transient", "s", 1)]).await.unwrap();
        assert_eq!(store.count(), 2);

        assert_eq!(store.load(dir.path()).unwrap(), 1);
        assert_eq!(store.records()[0].chunk().content(), "saved");
    }

    #[test]
    fn test_load_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with(StubEmbedder::new(2));
        assert!(matches!(
            store.load(dir.path()),
            Err(QaError::SnapshotNotFound(_))
        ));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let mut store = store_with(StubEmbedder::new(1).with("x", vec![1.0]));
        store.add_chunks(vec![chunk("x", "s", 0)]).await.unwrap();

        store.initialize();
        store.initialize();

        assert_eq!(store.count(), 0);
    }
}
