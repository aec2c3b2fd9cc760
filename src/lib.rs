//! Contact book backed by a hosted document store.
//!
//! The [`domain::ContactManager`] is the data access layer: a live
//! contact feed, get-by-id, prefix search, and create/update/delete over
//! a [`store::DocumentStore`] backend. The [`controller`] module holds
//! the screen-facing glue: a debounced search box, the list dashboard,
//! and the create/edit form. Rendering, routing, and the store service
//! itself live outside this crate.

pub mod controller;
pub mod domain;
pub mod errors;
pub mod helper;
pub mod notify;
pub mod prelude;
pub mod store;
