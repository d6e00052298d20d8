#![forbid(unsafe_code)]

//! Typeahead runtime
//!
//! An Elm-style program loop for terminal applications.
//!
//! - [`Model`] - application state with `init`, `update`, and `view`
//! - [`Cmd`] - side effects returned from `update`
//! - [`Program`] - the terminal event loop
//! - [`ProgramSimulator`] - runs a model without a terminal, for tests
//!
//! The runtime consumes canonical events from `typeahead-core`, feeds them
//! to `Model::update`, renders `Model::view` into a `typeahead-render`
//! frame, and presents only the cells that changed.

pub mod program;
pub mod simulator;

pub use program::{Cmd, Model, Program, ProgramConfig, TaskSpec};
pub use simulator::{CmdRecord, ProgramSimulator, TaskMode};
