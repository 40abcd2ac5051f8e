//! Service layer for business logic
//!
//! This module provides the logic shared between the HTTP handlers and the
//! CLI: link creation, short-code resolution and preview rendering.

pub mod crawler;
mod link_service;
pub mod preview;
pub mod resolver;

pub use crawler::{CrawlerDetect, DEFAULT_CRAWLER_PATTERNS, PatternCrawlerDetector};
pub use link_service::*;
pub use resolver::{Resolution, Resolver, ResolverSettings};
