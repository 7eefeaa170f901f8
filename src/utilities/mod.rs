//! Shared utilities: errors, configuration, console colors, prompts.

pub mod config;
pub mod errors;
pub mod printer;
pub mod prompts;
