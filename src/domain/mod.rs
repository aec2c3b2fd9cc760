pub mod contact;
pub mod manager;

pub use contact::{Contact, ContactForm, ValidationReq};
pub use manager::{ContactFeed, ContactManager};

pub(crate) use crate::errors::AppError;
