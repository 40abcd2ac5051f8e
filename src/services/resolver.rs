//! Short-code resolution
//!
//! Maps `(short code, User-Agent)` to the answer the HTTP layer sends:
//!
//! | input                         | bot_gated            | unconditional_html |
//! |-------------------------------|----------------------|--------------------|
//! | no code                       | 400                  | 400                |
//! | unknown code / any failure    | fallback             | fallback           |
//! | found, crawler UA             | preview (refresh)    | preview (script)   |
//! | found, other UA               | 307 → original URL   | preview (script)   |
//!
//! The fallback is either a 404 or a 307 to the service origin, per
//! [`FallbackPolicy`]. Lookup is read-only; nothing is written per request.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::HeaderValue;
use tracing::{debug, error, trace, warn};

use crate::config::{FallbackPolicy, PreviewConfig, ResponsePolicy};
use crate::errors::{LinkpeekError, Result};
use crate::services::crawler::CrawlerDetect;
use crate::services::preview::{RedirectMode, render_preview};
use crate::storage::{LinkRecord, LinkStore};
use crate::utils::{build_short_url, is_valid_short_code};

/// Outcome of a resolution, one per response shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No short code in the request
    MissingCode,
    /// Unknown code or internal failure, 404 fallback
    NotFound,
    /// Unknown code or internal failure, redirect-to-origin fallback
    RedirectToOrigin(String),
    /// 200 HTML preview page
    Preview(String),
    /// 307 straight to the stored URL
    Redirect(String),
}

impl Resolution {
    pub fn status(&self) -> StatusCode {
        match self {
            Resolution::MissingCode => StatusCode::BAD_REQUEST,
            Resolution::NotFound => StatusCode::NOT_FOUND,
            Resolution::RedirectToOrigin(_) | Resolution::Redirect(_) => {
                StatusCode::TEMPORARY_REDIRECT
            }
            Resolution::Preview(_) => StatusCode::OK,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::MissingCode => "missing_code",
            Resolution::NotFound => "not_found",
            Resolution::RedirectToOrigin(_) => "redirect_to_origin",
            Resolution::Preview(_) => "preview",
            Resolution::Redirect(_) => "redirect",
        }
    }
}

/// Settings the resolver needs, taken from config once at startup
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub response_policy: ResponsePolicy,
    pub fallback_policy: FallbackPolicy,
    pub default_title: String,
    pub public_origin: String,
}

impl ResolverSettings {
    pub fn from_config(preview: &PreviewConfig, public_origin: &str) -> Self {
        Self {
            response_policy: preview.response_policy,
            fallback_policy: preview.fallback_policy,
            default_title: preview.default_title.clone(),
            public_origin: public_origin.trim_end_matches('/').to_string(),
        }
    }
}

pub struct Resolver {
    links: Arc<dyn LinkStore>,
    crawler: Arc<dyn CrawlerDetect>,
    settings: ResolverSettings,
}

impl Resolver {
    pub fn new(
        links: Arc<dyn LinkStore>,
        crawler: Arc<dyn CrawlerDetect>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            links,
            crawler,
            settings,
        }
    }

    /// Resolve a short code for a client. Never fails: errors become the fallback.
    pub async fn resolve(&self, code: Option<&str>, user_agent: &str) -> Resolution {
        let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Resolution::MissingCode;
        };

        match self.try_resolve(code, user_agent).await {
            Ok(Some(resolution)) => resolution,
            Ok(None) => {
                debug!("Short code not found: {}", code);
                self.fallback()
            }
            Err(e) => {
                error!("Failed to resolve short code {}: {}", code, e);
                self.fallback()
            }
        }
    }

    async fn try_resolve(&self, code: &str, user_agent: &str) -> Result<Option<Resolution>> {
        if !is_valid_short_code(code) {
            trace!("Invalid short code rejected: {}", code);
            return Ok(None);
        }

        let Some(record) = self.links.get_by_short_code(code).await? else {
            return Ok(None);
        };

        if record.original_url.trim().is_empty() {
            warn!("Record {} has no original_url, treating as missing", code);
            return Ok(None);
        }

        let resolution = match self.settings.response_policy {
            ResponsePolicy::BotGated => {
                if self.crawler.is_crawler(user_agent) {
                    trace!("Crawler request for {}: {}", code, user_agent);
                    Resolution::Preview(self.render(&record, RedirectMode::MetaRefresh)?)
                } else {
                    // 其他客户端写入的行可能带控制字符，无法放进 Location 头
                    HeaderValue::try_from(record.original_url.as_str()).map_err(|e| {
                        LinkpeekError::internal(format!(
                            "Stored URL for {} is not a valid Location header: {}",
                            code, e
                        ))
                    })?;
                    Resolution::Redirect(record.original_url)
                }
            }
            // 爬虫不执行脚本，只读取 meta 标签；浏览器执行脚本后跳转
            ResponsePolicy::UnconditionalHtml => {
                Resolution::Preview(self.render(&record, RedirectMode::Script)?)
            }
        };

        Ok(Some(resolution))
    }

    fn render(&self, record: &LinkRecord, mode: RedirectMode) -> Result<String> {
        let page_url = build_short_url(&self.settings.public_origin, &record.short_code);
        render_preview(record, &page_url, &self.settings.default_title, mode)
    }

    fn fallback(&self) -> Resolution {
        match self.settings.fallback_policy {
            FallbackPolicy::NotFound => Resolution::NotFound,
            FallbackPolicy::RedirectToOrigin => {
                Resolution::RedirectToOrigin(format!("{}/", self.settings.public_origin))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::crawler::PatternCrawlerDetector;
    use crate::storage::MemoryLinkStore;

    const BOT_UA: &str = "facebookexternalhit/1.1";
    const BROWSER_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/126.0";

    async fn resolver_with(
        response_policy: ResponsePolicy,
        fallback_policy: FallbackPolicy,
    ) -> Resolver {
        let links = Arc::new(MemoryLinkStore::new());
        links
            .insert(LinkRecord {
                short_code: "demo01".to_string(),
                original_url: "https://example.com/landing".to_string(),
                description: Some("Demo Page".to_string()),
                thumbnail_url: Some("https://x/img.png".to_string()),
            })
            .await
            .unwrap();

        Resolver::new(
            links,
            Arc::new(PatternCrawlerDetector::default()),
            ResolverSettings {
                response_policy,
                fallback_policy,
                default_title: "Shared Link".to_string(),
                public_origin: "https://sho.rt".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_missing_code() {
        let resolver = resolver_with(ResponsePolicy::BotGated, FallbackPolicy::NotFound).await;
        assert_eq!(resolver.resolve(None, BROWSER_UA).await, Resolution::MissingCode);
        assert_eq!(resolver.resolve(Some("  "), BROWSER_UA).await, Resolution::MissingCode);
    }

    #[tokio::test]
    async fn test_bot_gated_branches() {
        let resolver = resolver_with(ResponsePolicy::BotGated, FallbackPolicy::NotFound).await;

        match resolver.resolve(Some("demo01"), BOT_UA).await {
            Resolution::Preview(html) => {
                assert!(html.contains(r#"content="Demo Page""#));
                assert!(html.contains(r#"content="https://sho.rt/short/demo01""#));
            }
            other => panic!("expected preview, got {:?}", other),
        }

        assert_eq!(
            resolver.resolve(Some("demo01"), BROWSER_UA).await,
            Resolution::Redirect("https://example.com/landing".to_string())
        );
        // 空 UA 视为普通浏览器
        assert_eq!(resolver.resolve(Some("demo01"), "").await.kind(), "redirect");
    }

    #[tokio::test]
    async fn test_unconditional_html_ignores_user_agent() {
        let resolver =
            resolver_with(ResponsePolicy::UnconditionalHtml, FallbackPolicy::NotFound).await;

        for ua in [BOT_UA, BROWSER_UA, ""] {
            let resolution = resolver.resolve(Some("demo01"), ua).await;
            assert_eq!(resolution.status(), StatusCode::OK);
            match resolution {
                Resolution::Preview(html) => assert!(html.contains("window.location.replace(")),
                other => panic!("expected preview, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_not_found_fallbacks() {
        let resolver = resolver_with(ResponsePolicy::BotGated, FallbackPolicy::NotFound).await;
        assert_eq!(resolver.resolve(Some("nope42"), BOT_UA).await, Resolution::NotFound);
        assert_eq!(
            resolver.resolve(Some("bad code!"), BOT_UA).await,
            Resolution::NotFound
        );

        let resolver =
            resolver_with(ResponsePolicy::BotGated, FallbackPolicy::RedirectToOrigin).await;
        assert_eq!(
            resolver.resolve(Some("nope42"), BROWSER_UA).await,
            Resolution::RedirectToOrigin("https://sho.rt/".to_string())
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Resolution::MissingCode.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Resolution::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Resolution::Redirect("https://e.com".into()).status(),
            StatusCode::TEMPORARY_REDIRECT
        );
        assert_eq!(
            Resolution::RedirectToOrigin("https://o/".into()).status(),
            StatusCode::TEMPORARY_REDIRECT
        );
    }
}
