//! Mode routing
//!
//! - Server mode (HTTP server, the default)
//! - CLI mode (one-shot commands against the same stores)

pub mod cli;
pub mod server;

pub use server::{configure_app, run_server};
