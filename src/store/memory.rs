use super::{DocumentStore, Fields, Snapshot, Watch};
use crate::errors::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

/// In-process document store. Mutations republish the full document set
/// on a watch channel, which is what backs the live contact feed in
/// tests and local runs.
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Fields>>,
    tx: watch::Sender<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Snapshot::new());

        Self {
            docs: RwLock::new(HashMap::new()),
            tx,
        }
    }

    async fn publish(&self) {
        let docs = self.docs.read().await;
        let snapshot: Snapshot = docs
            .iter()
            .map(|(id, fields)| (id.clone(), fields.clone()))
            .collect();
        drop(docs);

        // send_replace keeps the channel value current even while nobody
        // is subscribed yet.
        self.tx.send_replace(snapshot);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Fields>, AppError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn add(&self, fields: Fields) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();

        self.docs.write().await.insert(id.clone(), fields);
        self.publish().await;
        Ok(id)
    }

    async fn set(&self, id: &str, fields: Fields) -> Result<(), AppError> {
        {
            let mut docs = self.docs.write().await;
            match docs.get_mut(id) {
                Some(slot) => *slot = fields,
                None => return Err(AppError::NotFound("Document".to_string())),
            }
        }

        self.publish().await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.docs.write().await.remove(id).is_none() {
            return Err(AppError::NotFound("Document".to_string()));
        }

        self.publish().await;
        Ok(())
    }

    async fn range(&self, field: &str, start: &str, end: &str) -> Result<Snapshot, AppError> {
        let docs = self.docs.read().await;

        let mut matches: Snapshot = docs
            .iter()
            .filter(|(_, fields)| {
                fields
                    .get(field)
                    .is_some_and(|value| value.as_str() >= start && value.as_str() < end)
            })
            .map(|(id, fields)| (id.clone(), fields.clone()))
            .collect();

        matches.sort_by(|(_, a), (_, b)| a.get(field).cmp(&b.get(field)));
        Ok(matches)
    }

    async fn watch(&self) -> Result<Watch, AppError> {
        Ok(Watch::new(self.tx.subscribe()))
    }
}
