use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use super::Route;
use crate::domain::{ContactForm, ContactManager};
use crate::notify::Notices;

/// Form mode, chosen once when the form opens and never re-derived from
/// field state afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(String),
}

/// The contact form screen, covering both create and edit.
pub struct ContactEditor {
    mode: Mode,
    draft: ContactForm,
    manager: Arc<ContactManager>,
    notices: Notices,
    nav: UnboundedSender<Route>,
}

impl ContactEditor {
    /// Opens the form. Edit mode fetches the bound record and prefills
    /// the draft; an unknown id leaves the draft blank, and a transport
    /// failure is reported and then treated the same way.
    pub async fn open(
        manager: Arc<ContactManager>,
        mode: Mode,
        notices: Notices,
        nav: UnboundedSender<Route>,
    ) -> Self {
        let mut draft = ContactForm::default();

        if let Mode::Edit(id) = &mode {
            match manager.get_contact(id).await {
                Ok(Some(contact)) => draft = contact.to_form(),
                Ok(None) => {}
                Err(err) => notices.report("load contact", &err),
            }
        }

        Self {
            mode,
            draft,
            manager,
            notices,
            nav,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn draft(&self) -> &ContactForm {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ContactForm {
        &mut self.draft
    }

    /// Submits the draft. An invalid draft is a no-op: no store call, no
    /// navigation. A store failure is reported and the form stays put.
    /// Only a successful create or update navigates back to the list.
    pub async fn submit(&self) {
        if self.draft.validate().is_err() {
            return;
        }

        let result = match &self.mode {
            Mode::Create => self.manager.create_contact(&self.draft).await.map(|_| ()),
            Mode::Edit(id) => self.manager.update_contact(id, &self.draft).await,
        };

        match result {
            Ok(()) => {
                let _ = self.nav.send(Route::Dashboard);
            }
            Err(err) => self.notices.report("save contact", &err),
        }
    }
}
