pub mod memory;
pub mod rest;

use crate::errors::AppError;
use crate::helper;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// One stored document: field name to scalar string value.
pub type Fields = HashMap<String, String>;

/// The full collection contents, each document paired with its id.
pub type Snapshot = Vec<(String, Fields)>;

/// The hosted document store boundary. Documents are addressed by id
/// within a single collection; ids are assigned by the store on `add`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `Ok(None)` when the id is unknown. Transport failures are errors,
    /// not `None`.
    async fn get(&self, id: &str) -> Result<Option<Fields>, AppError>;

    /// Inserts a document and returns the store-assigned id.
    async fn add(&self, fields: Fields) -> Result<String, AppError>;

    /// Full overwrite of an existing document. `NotFound` if absent.
    async fn set(&self, id: &str, fields: Fields) -> Result<(), AppError>;

    /// `NotFound` if absent.
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Ordered half-open range query on a single field: documents whose
    /// value for `field` is `>= start` and `< end`, sorted by that value.
    /// Documents lacking the field are not matched.
    async fn range(&self, field: &str, start: &str, end: &str) -> Result<Snapshot, AppError>;

    /// Standing per-collection subscription that re-delivers the full
    /// document set on every change.
    async fn watch(&self) -> Result<Watch, AppError>;
}

/// Handle for a live subscription. Holding it keeps the server-side
/// watch open; `close` (or drop) releases it and aborts any background
/// poll task a backend spawned to service it.
pub struct Watch {
    rx: watch::Receiver<Snapshot>,
    task: Option<JoinHandle<()>>,
}

impl Watch {
    pub(crate) fn new(rx: watch::Receiver<Snapshot>) -> Self {
        Self { rx, task: None }
    }

    pub(crate) fn with_task(rx: watch::Receiver<Snapshot>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            task: Some(task),
        }
    }

    /// The snapshot as of the latest delivery.
    pub fn current(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Waits for the next delivery. `StreamClosed` once the publishing
    /// side is gone.
    pub async fn changed(&mut self) -> Result<Snapshot, AppError> {
        self.rx
            .changed()
            .await
            .map_err(|_| AppError::StreamClosed)?;

        let snapshot = self.rx.borrow_and_update().clone();
        Ok(snapshot)
    }

    pub fn close(self) {}
}

impl Drop for Watch {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Debug)]
pub enum StoreChoice {
    Memory,
    Rest,
}

impl StoreChoice {
    pub fn from(str: &str) -> Result<Self, AppError> {
        match str {
            "memory" => Ok(StoreChoice::Memory),
            "rest" => Ok(StoreChoice::Rest),
            _ => Err(AppError::Validation(
                "Not a recognized store choice".to_string(),
            )),
        }
    }

    pub fn is_which(&self) -> &str {
        match self {
            StoreChoice::Memory => "memory",
            StoreChoice::Rest => "rest",
        }
    }
}

/// Store backend selected by the `STORE_CHOICE` env var, defaulting to
/// the in-process store.
pub fn parse_store() -> Result<Arc<dyn DocumentStore>, AppError> {
    let choice = helper::get_env_value_by_key("STORE_CHOICE").unwrap_or("memory".to_string());

    match StoreChoice::from(&choice)? {
        StoreChoice::Memory => Ok(Arc::new(memory::MemoryStore::new())),
        StoreChoice::Rest => Ok(Arc::new(rest::RestStore::from_env()?)),
    }
}
