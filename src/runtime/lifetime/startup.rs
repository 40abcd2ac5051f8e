//! Application context construction
//!
//! The loaded configuration is turned into one [`AppContext`] that owns the
//! store handles and the services built on them. The server and the CLI both
//! receive it explicitly; nothing is kept in globals.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{
    LinkService, LinkSettings, PatternCrawlerDetector, Resolver, ResolverSettings,
};
use crate::storage::{StorageFactory, Stores};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<StaticConfig>,
    pub stores: Stores,
    pub link_service: Arc<LinkService>,
    pub resolver: Arc<Resolver>,
}

impl AppContext {
    /// Wire services onto already-built stores
    pub fn from_stores(config: StaticConfig, stores: Stores) -> Self {
        let origin = config.server.public_origin.as_str();

        let crawler = Arc::new(PatternCrawlerDetector::new(&config.preview.crawler_patterns));
        debug!("Crawler patterns: {:?}", crawler.patterns());

        let resolver = Arc::new(Resolver::new(
            stores.links.clone(),
            crawler,
            ResolverSettings::from_config(&config.preview, origin),
        ));

        let link_service = Arc::new(LinkService::new(
            stores.links.clone(),
            stores.blobs.clone(),
            LinkSettings::from_config(&config.links, &config.store.thumbnail_prefix, origin),
        ));

        Self {
            config: Arc::new(config),
            stores,
            link_service,
            resolver,
        }
    }
}

/// 校验配置并创建存储与服务
pub fn prepare_app_context(config: StaticConfig) -> Result<AppContext> {
    let start_time = std::time::Instant::now();

    config.validate().context("Invalid configuration")?;
    let stores = StorageFactory::create(&config.store).context("Failed to create storage")?;

    info!(
        "Response policy: {}, fallback: {}",
        config.preview.response_policy, config.preview.fallback_policy
    );

    let ctx = AppContext::from_stores(config, stores);
    debug!("App context ready in {:?}", start_time.elapsed());
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;

    #[test]
    fn test_memory_context() {
        let mut config = StaticConfig::default();
        config.store.backend = StoreBackend::Memory;
        let ctx = prepare_app_context(config).unwrap();
        assert_eq!(ctx.stores.links.backend_name(), "memory");
        assert_eq!(ctx.link_service.settings().code_length, 6);
    }

    #[test]
    fn test_supabase_without_credentials_fails() {
        assert!(prepare_app_context(StaticConfig::default()).is_err());
    }
}
