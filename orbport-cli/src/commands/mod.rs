//! Subcommand implementations.

pub mod import;
pub mod setup;
