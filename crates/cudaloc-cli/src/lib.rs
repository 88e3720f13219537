//! `cudaloc` command-line adapter.
//!
//! Wires the process environment, the python interpreter and the terminal
//! to `cudaloc-core`. All resolution logic lives in the core crate.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod python;

pub use commands::Commands;
pub use error::{CliError, exit_code_for};
pub use parser::Cli;
