use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use super::Route;
use crate::domain::{Contact, ContactFeed, ContactManager};
use crate::errors::AppError;
use crate::notify::Notices;

/// What the list screen is currently showing: the live collection, or a
/// static search snapshot that never refreshes on its own.
enum ListView {
    Live(ContactFeed),
    Results(Vec<Contact>),
}

/// The contact list screen. Opens subscribed to the live stream; a
/// search swaps in a one-shot snapshot; delete and edit actions are
/// dispatched from here.
pub struct Dashboard {
    manager: Arc<ContactManager>,
    view: ListView,
    notices: Notices,
    nav: UnboundedSender<Route>,
}

impl Dashboard {
    pub async fn open(
        manager: Arc<ContactManager>,
        notices: Notices,
        nav: UnboundedSender<Route>,
    ) -> Result<Self, AppError> {
        let feed = manager.list_contacts().await?;

        Ok(Self {
            manager,
            view: ListView::Live(feed),
            notices,
            nav,
        })
    }

    /// Contacts currently on screen.
    pub fn contacts(&self) -> Vec<Contact> {
        match &self.view {
            ListView::Live(feed) => feed.current(),
            ListView::Results(contacts) => contacts.clone(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.view, ListView::Live(_))
    }

    /// Next update of the live view. Search snapshots never refresh, so
    /// in search mode this reports the stream as closed instead of
    /// suspending forever.
    pub async fn changed(&mut self) -> Result<Vec<Contact>, AppError> {
        match &mut self.view {
            ListView::Live(feed) => feed.changed().await,
            ListView::Results(_) => Err(AppError::StreamClosed),
        }
    }

    /// Runs a stabilized query and swaps the active list to its one-shot
    /// result, tearing down the live subscription. A failed search is
    /// reported and leaves the current view standing.
    pub async fn apply_search(&mut self, term: &str) {
        match self.manager.search_contacts_by_prefix(term).await {
            Ok(contacts) => {
                let previous = std::mem::replace(&mut self.view, ListView::Results(contacts));
                if let ListView::Live(feed) = previous {
                    feed.close();
                }
            }
            Err(err) => self.notices.report("search contacts", &err),
        }
    }

    /// Deletes a contact. Failures are reported through the notice hook
    /// and otherwise swallowed; a successful delete shows up through the
    /// live stream by itself.
    pub async fn delete(&self, id: &str) {
        if let Err(err) = self.manager.delete_contact(id).await {
            self.notices.report("delete contact", &err);
        }
    }

    /// Asks the router for the edit form bound to this contact. No local
    /// state changes; edits come back through the live stream.
    pub fn edit(&self, contact: &Contact) {
        let _ = self.nav.send(Route::Form(Some(contact.id.clone())));
    }

    pub fn new_contact(&self) {
        let _ = self.nav.send(Route::Form(None));
    }

    pub fn close(self) {
        if let ListView::Live(feed) = self.view {
            feed.close();
        }
    }
}
