use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Quiet period a typed value must survive before it becomes a query.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounced search input.
///
/// Feed it the text on every change; once the text has been stable for
/// the quiet period it is emitted downstream, unless it equals the last
/// value already emitted. Purely reactive, no I/O of its own.
pub struct SearchBox {
    tx: UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl SearchBox {
    pub fn new() -> (Self, UnboundedReceiver<String>) {
        Self::with_quiet_period(DEBOUNCE)
    }

    pub fn with_quiet_period(quiet: Duration) -> (Self, UnboundedReceiver<String>) {
        let (tx, mut input_rx) = mpsc::unbounded_channel::<String>();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut pending: Option<String> = None;
            let mut last_emitted: Option<String> = None;
            let mut deadline = Instant::now();

            loop {
                select! {
                    input = input_rx.recv() => {
                        match input {
                            Some(value) => {
                                // Every keystroke restarts the quiet period.
                                pending = Some(value);
                                deadline = Instant::now() + quiet;
                            }
                            None => break,
                        }
                    }
                    _ = sleep_until(deadline), if pending.is_some() => {
                        let value = pending.take().unwrap_or_default();

                        if last_emitted.as_ref() != Some(&value) {
                            if out_tx.send(value.clone()).is_err() {
                                break;
                            }
                            last_emitted = Some(value);
                        }
                    }
                }
            }
        });

        (Self { tx, task }, out_rx)
    }

    /// Current text of the input; call on every change.
    pub fn input(&self, value: &str) {
        let _ = self.tx.send(value.to_string());
    }

    pub fn close(self) {}
}

impl Drop for SearchBox {
    fn drop(&mut self) {
        self.task.abort();
    }
}
