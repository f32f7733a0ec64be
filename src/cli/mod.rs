// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for running landmark extraction.
//!
//! This module contains the command-line interface logic, including argument
//! parsing and the `extract` command implementation.

// Modules
/// CLI arguments.
pub mod args;

/// Extraction logic.
pub mod extract;

/// Logging helpers.
pub mod logging;
