//! HTTP API module
//!
//! Single-purpose HTTP surface around the fill pipeline.
//! Run with `plantilla serve`.

pub mod handlers;
pub mod server;

pub use server::run_api_server;
