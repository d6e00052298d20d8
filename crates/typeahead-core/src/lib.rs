#![forbid(unsafe_code)]

//! Core: canonical input events, geometry, and the terminal session guard.

pub mod event;
pub mod geometry;
pub mod terminal_session;
