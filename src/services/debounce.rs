use std::time::Duration;

use tokio::sync::watch;

/// Derives a settled value from a rapidly changing input
///
/// Every new input restarts the quiet period. The derived value only moves
/// once the input has stayed unchanged for the whole period, and only when
/// the settled value differs from the current one.
pub struct Debouncer<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Spawns the debounce task on the current tokio runtime
    pub fn new(initial: T, quiet: Duration) -> Self {
        let (input, input_rx) = watch::channel(initial.clone());
        let (output_tx, output) = watch::channel(initial);

        tokio::spawn(Self::debounce_task(input_rx, output_tx, quiet));

        Self { input, output }
    }

    async fn debounce_task(
        mut input_rx: watch::Receiver<T>,
        output_tx: watch::Sender<T>,
        quiet: Duration,
    ) {
        // Each outer iteration handles one burst of edits
        while input_rx.changed().await.is_ok() {
            loop {
                tokio::select! {
                    changed = input_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tokio::time::sleep(quiet) => break,
                }
            }

            let settled = input_rx.borrow_and_update().clone();
            output_tx.send_if_modified(|current| {
                if *current == settled {
                    false
                } else {
                    *current = settled;
                    true
                }
            });
        }

        tracing::debug!("Debounce input closed, task stopped");
    }

    /// Feeds a new raw input value
    pub fn set(&self, value: T) {
        self.input.send_replace(value);
    }

    /// Latest raw input, settled or not
    pub fn latest_input(&self) -> T {
        self.input.borrow().clone()
    }

    /// Current settled value
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    /// Receiver notified on every settled change
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }
}
