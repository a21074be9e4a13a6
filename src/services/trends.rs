use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::db::TrendStore;
use crate::models::Movie;

/// Message for asynchronous trend writes
struct RecordMessage {
    term: String,
    movie: Movie,
}

/// Fire-and-forget front for `TrendStore::record_search`
///
/// Writes are queued to a background task, so recording never delays or
/// fails the search that triggered it.
#[derive(Clone)]
pub struct TrendRecorder {
    write_tx: mpsc::UnboundedSender<RecordMessage>,
}

/// Handle for gracefully shutting down the recorder task
pub struct TrendRecorderHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl TrendRecorderHandle {
    /// Flushes queued writes, then waits for the writer task to stop
    pub async fn shutdown(self) {
        // Signal the writer; it drains the queue before exiting
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Trend recorder shutdown signal sent");

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Trend recorder task join error");
        }
    }
}

impl TrendRecorder {
    /// Creates a recorder and spawns its writer task
    pub fn new(store: Arc<dyn TrendStore>) -> (Self, TrendRecorderHandle) {
        // Unbounded so record() never waits on a slow store
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            Self::writer_task(store, write_rx, shutdown_rx).await;
        });

        (Self { write_tx }, TrendRecorderHandle { shutdown_tx, task })
    }

    async fn writer_task(
        store: Arc<dyn TrendStore>,
        mut write_rx: mpsc::UnboundedReceiver<RecordMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Trend recorder task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    Self::write(store.as_ref(), msg).await;
                }
                Some(()) = shutdown_rx.recv() => {
                    // Senders may outlive the task, so drain without waiting
                    let mut flushed = 0;
                    while let Ok(msg) = write_rx.try_recv() {
                        Self::write(store.as_ref(), msg).await;
                        flushed += 1;
                    }

                    tracing::info!(flushed, "Trend recorder task stopped");
                    break;
                }
                // All senders and the shutdown handle are gone
                else => break,
            }
        }
    }

    async fn write(store: &dyn TrendStore, msg: RecordMessage) {
        if let Err(e) = store.record_search(&msg.term, &msg.movie).await {
            tracing::error!(error = %e, term = %msg.term, "Failed to record search");
        }
    }

    /// Queues a search record and returns immediately
    pub fn record(&self, term: &str, movie: &Movie) {
        let msg = RecordMessage {
            term: term.to_string(),
            movie: movie.clone(),
        };

        // Only fails once the writer task has stopped
        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to queue search record");
        }
    }
}
