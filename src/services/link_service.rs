//! Link creation service
//!
//! Provides the creation flow shared by the HTTP handlers and the CLI:
//! validate → upload thumbnail → allocate code → insert record.
//!
//! The blob store and the record store are not transactional. When a step
//! after a successful upload fails, the uploaded object is deleted again
//! before the error is returned.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::LinksConfig;
use crate::errors::{LinkpeekError, Result};
use crate::storage::{BlobStore, LinkRecord, LinkStore, ThumbnailFile};
use crate::utils::url_validator::{validate_url, validation_error_message};
use crate::utils::{build_short_url, generate_short_code, thumbnail_object_path};

// ============ Request/Response DTOs ============

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// Destination URL
    pub original_url: String,
    /// Preview title / description (optional)
    pub description: Option<String>,
    /// Preview image (optional)
    pub thumbnail: Option<ThumbnailFile>,
}

/// Result of link creation
#[derive(Debug, Clone, Serialize)]
pub struct LinkCreateResult {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl LinkCreateResult {
    fn new(record: LinkRecord, public_origin: &str) -> Self {
        Self {
            short_url: build_short_url(public_origin, &record.short_code),
            short_code: record.short_code,
            original_url: record.original_url,
            description: record.description,
            thumbnail_url: record.thumbnail_url,
        }
    }
}

/// Creation limits, taken from config once at startup
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub code_length: usize,
    pub max_code_attempts: u32,
    pub max_thumbnail_bytes: usize,
    pub thumbnail_prefix: String,
    pub public_origin: String,
}

impl LinkSettings {
    pub fn from_config(links: &LinksConfig, thumbnail_prefix: &str, public_origin: &str) -> Self {
        Self {
            code_length: links.code_length,
            max_code_attempts: links.max_code_attempts,
            max_thumbnail_bytes: links.max_thumbnail_bytes,
            thumbnail_prefix: thumbnail_prefix.to_string(),
            public_origin: public_origin.trim_end_matches('/').to_string(),
        }
    }
}

// ============ LinkService Implementation ============

pub struct LinkService {
    links: Arc<dyn LinkStore>,
    blobs: Arc<dyn BlobStore>,
    settings: LinkSettings,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkStore>,
        blobs: Arc<dyn BlobStore>,
        settings: LinkSettings,
    ) -> Self {
        Self {
            links,
            blobs,
            settings,
        }
    }

    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }

    /// Create a short link
    ///
    /// Steps run strictly in sequence; nothing is retried.
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<LinkCreateResult> {
        let original_url = self.validate_original_url(&req.original_url)?;
        if let Some(ref thumbnail) = req.thumbnail {
            self.validate_thumbnail(thumbnail)?;
        }

        let description = req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        // 1. 上传缩略图（失败则整个流程中止，不写记录）
        let uploaded_path = match req.thumbnail {
            Some(ref thumbnail) => Some(self.upload_thumbnail(thumbnail).await?),
            None => None,
        };
        let thumbnail_url = uploaded_path.as_deref().map(|p| self.blobs.public_url(p));

        // 2. 分配短码 + 写入记录，失败时删除已上传的缩略图
        let inserted = match self.allocate_code().await {
            Ok(short_code) => {
                let record = LinkRecord {
                    short_code,
                    original_url,
                    description,
                    thumbnail_url,
                };
                self.links.insert(record).await
            }
            Err(e) => Err(e),
        };

        match inserted {
            Ok(record) => {
                info!(
                    "Created link {} -> {} (thumbnail: {})",
                    record.short_code,
                    record.original_url,
                    record.thumbnail_url.is_some()
                );
                Ok(LinkCreateResult::new(record, &self.settings.public_origin))
            }
            Err(e) => {
                error!("Failed to persist link: {}", e);
                if let Some(path) = uploaded_path {
                    self.discard_thumbnail(&path).await;
                }
                Err(e)
            }
        }
    }

    fn validate_original_url(&self, raw: &str) -> Result<String> {
        let trimmed = raw.trim();
        validate_url(trimmed).map_err(|e| {
            debug!("Rejected original_url {:?}: {}", raw, e);
            LinkpeekError::validation(validation_error_message(&e))
        })?;
        Ok(trimmed.to_string())
    }

    fn validate_thumbnail(&self, thumbnail: &ThumbnailFile) -> Result<()> {
        if thumbnail.data.is_empty() {
            return Err(LinkpeekError::validation("Thumbnail file is empty"));
        }
        if thumbnail.data.len() > self.settings.max_thumbnail_bytes {
            return Err(LinkpeekError::validation(format!(
                "Thumbnail exceeds maximum size of {} bytes",
                self.settings.max_thumbnail_bytes
            )));
        }
        if let Some(ref ct) = thumbnail.content_type
            && !ct.is_empty()
            && !ct.to_ascii_lowercase().starts_with("image/")
        {
            return Err(LinkpeekError::validation(format!(
                "Thumbnail must be an image, got {}",
                ct
            )));
        }
        Ok(())
    }

    async fn upload_thumbnail(&self, thumbnail: &ThumbnailFile) -> Result<String> {
        let path = thumbnail_object_path(
            &self.settings.thumbnail_prefix,
            &thumbnail.file_name,
            Utc::now(),
        );
        debug!("Uploading thumbnail to {}", path);

        self.blobs.upload(&path, thumbnail).await.map_err(|e| {
            error!("Thumbnail upload failed: {}", e);
            match e {
                LinkpeekError::Upload(_) => e,
                other => LinkpeekError::upload(other.message().to_string()),
            }
        })?;

        Ok(path)
    }

    /// 生成未被占用的短码，有限次数重试
    async fn allocate_code(&self) -> Result<String> {
        for attempt in 1..=self.settings.max_code_attempts {
            let code = generate_short_code(self.settings.code_length);
            match self.links.get_by_short_code(&code).await {
                Ok(None) => return Ok(code),
                Ok(Some(_)) => {
                    warn!("Short code collision on attempt {}: {}", attempt, code);
                }
                Err(e) => {
                    return Err(LinkpeekError::persistence(format!(
                        "Failed to check short code availability: {}",
                        e.message()
                    )));
                }
            }
        }

        Err(LinkpeekError::persistence(format!(
            "Could not allocate a unique short code after {} attempts",
            self.settings.max_code_attempts
        )))
    }

    /// 补偿：删除孤立的缩略图，失败只记录日志
    async fn discard_thumbnail(&self, path: &str) {
        match self.blobs.remove(path).await {
            Ok(()) => debug!("Removed orphaned thumbnail {}", path),
            Err(e) => warn!("Failed to remove orphaned thumbnail {}: {}", path, e),
        }
    }
}
