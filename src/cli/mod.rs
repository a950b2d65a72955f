//! CLI command handlers

pub mod commands;

pub use commands::{check, fill, serve};
