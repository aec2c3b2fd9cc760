use super::*;

use std::sync::Arc;

use crate::store::{self, DocumentStore, Snapshot, Watch};

/// High sentinel the store orders after every name character. Closing a
/// range at `term + RANGE_SENTINEL` turns an ordered range query into a
/// starts-with match.
const RANGE_SENTINEL: char = '\u{f8ff}';

/// The data access layer. Sole owner of every call that crosses the
/// document store boundary; everything above it works with `Contact` and
/// `ContactForm`, never with raw documents.
pub struct ContactManager {
    store: Arc<dyn DocumentStore>,
}

impl ContactManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Backend picked by the `STORE_CHOICE` env var.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store::parse_store()?))
    }

    /// Live view of the whole collection. The feed re-delivers the full
    /// contact set on every store change until it is closed; ordering is
    /// whatever the store returns.
    pub async fn list_contacts(&self) -> Result<ContactFeed, AppError> {
        Ok(ContactFeed {
            watch: self.store.watch().await?,
        })
    }

    /// Single fetch. `Ok(None)` means the id is unknown; a transport
    /// failure stays an `Err` here so callers can tell the two apart
    /// before deciding to collapse them.
    pub async fn get_contact(&self, id: &str) -> Result<Option<Contact>, AppError> {
        let fields = self.store.get(id).await?;
        Ok(fields.map(|fields| Contact::from_fields(id, &fields)))
    }

    /// One-shot snapshot of every contact whose full name starts with
    /// `term`, case-sensitively. An empty term matches everything.
    pub async fn search_contacts_by_prefix(&self, term: &str) -> Result<Vec<Contact>, AppError> {
        let end = format!("{}{}", term, RANGE_SENTINEL);
        let snapshot = self
            .store
            .range(contact::FIELD_FULL_NAME, term, &end)
            .await?;

        Ok(contacts_of(&snapshot))
    }

    /// Inserts a new record; the store assigns and returns the id.
    pub async fn create_contact(&self, form: &ContactForm) -> Result<String, AppError> {
        self.store.add(form.to_fields()).await
    }

    /// Full overwrite of the addressed record with `form`'s fields.
    /// Fails with `NotFound` if the id does not exist.
    pub async fn update_contact(&self, id: &str, form: &ContactForm) -> Result<(), AppError> {
        self.store.set(id, form.to_fields()).await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(id).await
    }
}

/// The live contact stream: a long-lived subscription that must be
/// explicitly closed (or dropped) to release the standing watch.
pub struct ContactFeed {
    watch: Watch,
}

impl ContactFeed {
    /// The contact set as of the latest delivery.
    pub fn current(&self) -> Vec<Contact> {
        contacts_of(&self.watch.current())
    }

    /// Waits for the next store change and returns the new full set.
    /// Errors with `StreamClosed` once the store side is gone.
    pub async fn changed(&mut self) -> Result<Vec<Contact>, AppError> {
        let snapshot = self.watch.changed().await?;
        Ok(contacts_of(&snapshot))
    }

    /// Tears the subscription down. Dropping the feed does the same.
    pub fn close(self) {
        self.watch.close();
    }
}

fn contacts_of(snapshot: &Snapshot) -> Vec<Contact> {
    snapshot
        .iter()
        .map(|(id, fields)| Contact::from_fields(id, fields))
        .collect()
}
