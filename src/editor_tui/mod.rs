//! Resume editor Terminal User Interface (TUI)
//!
//! A form on the left, the live preview on the right. Every edit runs the
//! preview/autosave pipeline; fields with candidate lists show a typeahead
//! dropdown under the cursor.

pub mod app;
pub mod components;
pub mod traits;
pub mod ui;

pub use app::App;
