//! User-facing failure reporting.
//!
//! Controllers swallow store failures instead of letting them escape to a
//! global handler, but every swallow goes through this hook first so a UI
//! layer (toast, banner) can subscribe and show something.

use crate::errors::AppError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Operation that failed, e.g. "delete contact".
    pub operation: &'static str,
    pub message: String,
}

#[derive(Clone)]
pub struct Notices {
    tx: UnboundedSender<Notice>,
}

impl Notices {
    /// A hook plus the receiving end a UI layer would drain.
    pub fn channel() -> (Self, UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// A hook nobody listens to. Reports still land in the log.
    pub fn disabled() -> Self {
        let (tx, _) = mpsc::unbounded_channel();
        Self { tx }
    }

    pub fn report(&self, operation: &'static str, err: &AppError) {
        log::warn!("{} failed: {}", operation, err);

        // A closed receiver just means no UI is listening.
        let _ = self.tx.send(Notice {
            operation,
            message: err.to_string(),
        });
    }
}
