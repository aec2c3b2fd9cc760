pub mod dashboard;
pub mod editor;
pub mod search;

pub use dashboard::Dashboard;
pub use editor::{ContactEditor, Mode};
pub use search::{SearchBox, DEBOUNCE};

/// Named routes the controllers ask the (out-of-scope) router to visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    /// The contact form; `Some(id)` opens it over an existing record.
    Form(Option<String>),
}
