//! Serial background queue for thumbnail cache writes.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::domain::entities::CacheKey;
use crate::domain::ports::ThumbnailStorePort;

#[derive(Debug)]
enum WriteJob {
    Bytes { key: CacheKey, bytes: Bytes },
    MoveFile { key: CacheKey, source: PathBuf },
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task.
///
/// Jobs run one at a time in submission order; callers never wait for them
/// unless they explicitly call [`CacheWriter::flush`].
#[derive(Debug, Clone)]
pub struct CacheWriter {
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl CacheWriter {
    /// Spawns the writer task on the current runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn ThumbnailStorePort>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run(store, rx));
        Self { tx }
    }

    async fn run(store: Arc<dyn ThumbnailStorePort>, mut rx: mpsc::UnboundedReceiver<WriteJob>) {
        while let Some(job) = rx.recv().await {
            match job {
                WriteJob::Bytes { key, bytes } => {
                    if let Err(e) = store.write(&key, &bytes).await {
                        warn!(key = %key, error = %e, "Failed to write thumbnail to cache");
                    }
                }
                WriteJob::MoveFile { key, source } => {
                    if let Err(e) = store.move_into(&key, &source).await {
                        warn!(key = %key, error = %e, "Failed to move thumbnail into cache");
                        let _ = tokio::fs::remove_file(&source).await;
                    }
                }
                WriteJob::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("Cache writer stopped");
    }

    /// Queues a write of `bytes` under `key`.
    pub fn write_bytes(&self, key: CacheKey, bytes: Bytes) {
        if let Err(e) = self.tx.send(WriteJob::Bytes { key, bytes }) {
            error!("Failed to queue cache write: {}", e);
        }
    }

    /// Queues a move of an exported file into the cache under `key`.
    pub fn move_file(&self, key: CacheKey, source: PathBuf) {
        if let Err(e) = self.tx.send(WriteJob::MoveFile { key, source }) {
            error!("Failed to queue cache move: {}", e);
        }
    }

    /// Waits until every job queued before this call has completed.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteJob::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MediaId, ThumbnailSize};
    use crate::domain::ports::mocks::MockThumbnailStore;

    #[tokio::test]
    async fn test_flush_waits_for_queued_writes() {
        let store = Arc::new(MockThumbnailStore::new());
        let writer = CacheWriter::spawn(store.clone());

        for i in 0..10u64 {
            let key = CacheKey::new(&MediaId::from(i), ThumbnailSize::Small);
            writer.write_bytes(key, Bytes::from_static(b"data"));
        }
        writer.flush().await;

        assert_eq!(store.write_count(), 10);
    }

    #[tokio::test]
    async fn test_move_file_consumes_source() {
        let temp = tempfile::TempDir::new().unwrap();
        let source = temp.path().join("export.jpg");
        std::fs::write(&source, b"exported").unwrap();

        let store = Arc::new(MockThumbnailStore::new());
        let writer = CacheWriter::spawn(store.clone());
        let key = CacheKey::new(&MediaId::new("7"), ThumbnailSize::Medium);

        writer.move_file(key.clone(), source.clone());
        writer.flush().await;

        assert_eq!(store.peek(&key).await.as_deref(), Some(&b"exported"[..]));
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = Arc::new(MockThumbnailStore::new());
        let writer = CacheWriter::spawn(store.clone());
        let key = CacheKey::new(&MediaId::new("1"), ThumbnailSize::Small);

        writer.write_bytes(key.clone(), Bytes::from_static(b"first"));
        writer.write_bytes(key.clone(), Bytes::from_static(b"second"));
        writer.flush().await;

        assert_eq!(store.peek(&key).await.as_deref(), Some(&b"second"[..]));
    }
}
