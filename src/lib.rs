//! Resume builder with a live preview pipeline and typeahead suggestions
//!
//! The library holds the terminal-independent core ([`pipeline`], [`suggest`],
//! [`templates`], [`storage`]) and the interactive editor built on it
//! ([`editor_tui`]).

pub mod config;
pub mod editor_tui;
pub mod errors;
pub mod markup;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod suggest;
pub mod templates;
