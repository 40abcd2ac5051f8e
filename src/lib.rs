//! linkpeek - a URL shortener with bot-aware link previews
//!
//! Short links resolve to an HTTP 307 for browsers and to a small HTML page
//! with Open Graph / Twitter Card tags for social-media crawlers, so shared
//! links unfurl with a custom title and thumbnail.
//!
//! # Architecture
//! - `storage`: record store and thumbnail store backends (Supabase, memory)
//! - `services`: creation flow, crawler detection, resolution, preview pages
//! - `api`: HTTP services and middleware
//! - `config`: Configuration management
//! - `runtime`: Application context and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
