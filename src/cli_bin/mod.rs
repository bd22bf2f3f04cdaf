//! CLI module for the mattersync command-line interface
//!
//! Argument parsing and the command handlers that drive the library.

pub mod args;
pub mod commands;
