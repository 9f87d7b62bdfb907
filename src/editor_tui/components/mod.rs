//! Reusable UI components for the resume editor

pub mod form_field;
pub mod preview_pane;
pub mod template_selector;

pub use form_field::{Form, FormField};
pub use preview_pane::PreviewPane;
pub use template_selector::TemplateSelector;
