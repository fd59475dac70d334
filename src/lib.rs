//! `sleep-merge` library crate.
//!
//! The binary (`sleep-merge`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - cleaners and the joiner can be driven with arbitrary tables
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod clean;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod join;
pub mod report;
