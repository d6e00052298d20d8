#![forbid(unsafe_code)]

//! Typeahead demo: an async and a sync autocomplete side by side.

pub mod app;
pub mod cli;
pub mod logging;
pub mod options;
