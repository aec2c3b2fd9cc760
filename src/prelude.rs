pub use crate::controller::{ContactEditor, Dashboard, Mode, Route, SearchBox, DEBOUNCE};
pub use crate::domain::{
    contact::{self, Contact, ContactForm},
    manager::{ContactFeed, ContactManager},
};
pub use crate::errors::AppError;
pub use crate::notify::{Notice, Notices};
pub use crate::store::{self, parse_store, DocumentStore, Fields, Snapshot, Watch};
