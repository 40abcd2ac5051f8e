//! Supabase backend
//!
//! 记录表走 PostgREST (`/rest/v1/<table>`)，缩略图走 Storage API
//! (`/storage/v1/object/<bucket>/<path>`)。ureq 是同步客户端，所有请求都放在
//! spawn_blocking 里执行。单次尝试，不重试。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};
use ureq::Agent;

use crate::config::StoreConfig;
use crate::errors::{LinkpeekError, Result};
use crate::storage::{BlobStore, LinkRecord, LinkStore, ThumbnailFile};

const SELECT_COLUMNS: &str = "short_code,original_url,description,thumbnail_url";

/// Shared HTTP client for both APIs
pub struct SupabaseClient {
    base_url: String,
    key: String,
    bearer: String,
    agent: Agent,
}

impl SupabaseClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() || config.key.is_empty() {
            return Err(LinkpeekError::config(
                "Supabase backend requires store.url and store.key",
            ));
        }

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        Ok(Self {
            base_url,
            key: config.key.clone(),
            bearer: format!("Bearer {}", config.key),
            agent,
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket,
            encode_object_path(path)
        )
    }

    fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket,
            encode_object_path(path)
        )
    }

    fn insert_sync(&self, table: &str, record: &LinkRecord) -> Result<LinkRecord> {
        let url = self.rest_url(table);
        trace!("POST {}", url);

        let mut resp = self
            .agent
            .post(&url)
            .header("apikey", self.key.as_str())
            .header("Authorization", self.bearer.as_str())
            .header("Prefer", "return=representation")
            .send_json([record])
            .map_err(|e| LinkpeekError::persistence(format!("Failed to insert link: {}", e)))?;

        let rows: Vec<LinkRecord> = resp.body_mut().read_json().map_err(|e| {
            LinkpeekError::persistence(format!("Unexpected insert response: {}", e))
        })?;

        rows.into_iter()
            .next()
            .ok_or_else(|| LinkpeekError::persistence("Insert returned no rows"))
    }

    fn select_by_code_sync(&self, table: &str, code: &str) -> Result<Option<LinkRecord>> {
        let url = self.rest_url(table);
        trace!("GET {} short_code={}", url, code);

        let mut resp = self
            .agent
            .get(&url)
            .query("select", SELECT_COLUMNS)
            .query("short_code", format!("eq.{}", code))
            .query("limit", "1")
            .header("apikey", self.key.as_str())
            .header("Authorization", self.bearer.as_str())
            .call()
            .map_err(|e| LinkpeekError::persistence(format!("Failed to query link: {}", e)))?;

        let rows: Vec<LinkRecord> = resp.body_mut().read_json().map_err(|e| {
            LinkpeekError::persistence(format!("Unexpected query response: {}", e))
        })?;

        Ok(rows.into_iter().next())
    }

    fn upload_sync(&self, bucket: &str, path: &str, file: &ThumbnailFile) -> Result<()> {
        let url = self.object_url(bucket, path);
        trace!("POST {} ({} bytes)", url, file.data.len());

        self.agent
            .post(&url)
            .header("apikey", self.key.as_str())
            .header("Authorization", self.bearer.as_str())
            .header("Content-Type", file.content_type_or_default())
            .header("x-upsert", "false")
            .header("Cache-Control", "max-age=3600")
            .send(&file.data[..])
            .map_err(|e| LinkpeekError::upload(format!("Failed to upload thumbnail: {}", e)))?;

        Ok(())
    }

    fn remove_sync(&self, bucket: &str, path: &str) -> Result<()> {
        let url = self.object_url(bucket, path);
        trace!("DELETE {}", url);

        self.agent
            .delete(&url)
            .header("apikey", self.key.as_str())
            .header("Authorization", self.bearer.as_str())
            .call()
            .map_err(|e| LinkpeekError::upload(format!("Failed to remove thumbnail: {}", e)))?;

        Ok(())
    }
}

/// 对象路径按段编码，保留 `/`
fn encode_object_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// 在阻塞线程池里执行同步 HTTP 调用
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| LinkpeekError::internal(format!("Blocking task failed: {}", e)))?
}

pub struct SupabaseLinkStore {
    client: Arc<SupabaseClient>,
    table: Arc<str>,
}

impl SupabaseLinkStore {
    pub fn new(client: Arc<SupabaseClient>, table: &str) -> Self {
        Self {
            client,
            table: Arc::from(table),
        }
    }
}

#[async_trait]
impl LinkStore for SupabaseLinkStore {
    async fn insert(&self, record: LinkRecord) -> Result<LinkRecord> {
        let client = self.client.clone();
        let table = self.table.clone();
        let stored = run_blocking(move || client.insert_sync(&table, &record)).await?;
        debug!("Inserted link {} into {}", stored.short_code, self.table);
        Ok(stored)
    }

    async fn get_by_short_code(&self, code: &str) -> Result<Option<LinkRecord>> {
        let client = self.client.clone();
        let table = self.table.clone();
        let code = code.to_string();
        run_blocking(move || client.select_by_code_sync(&table, &code)).await
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}

pub struct SupabaseBlobStore {
    client: Arc<SupabaseClient>,
    bucket: Arc<str>,
}

impl SupabaseBlobStore {
    pub fn new(client: Arc<SupabaseClient>, bucket: &str) -> Self {
        Self {
            client,
            bucket: Arc::from(bucket),
        }
    }
}

#[async_trait]
impl BlobStore for SupabaseBlobStore {
    async fn upload(&self, path: &str, file: &ThumbnailFile) -> Result<()> {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let path = path.to_string();
        // Bytes clone 只增加引用计数
        let file = file.clone();
        run_blocking(move || client.upload_sync(&bucket, &path, &file)).await
    }

    fn public_url(&self, path: &str) -> String {
        self.client.public_object_url(&self.bucket, path)
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let path = path.to_string();
        run_blocking(move || client.remove_sync(&bucket, &path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StoreConfig {
        StoreConfig {
            url: "https://project.supabase.co/".to_string(),
            key: "anon-key".to_string(),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_client_requires_credentials() {
        let config = StoreConfig::default();
        assert!(matches!(
            SupabaseClient::new(&config),
            Err(LinkpeekError::Config(_))
        ));
    }

    #[test]
    fn test_urls() {
        let client = SupabaseClient::new(&test_config()).unwrap();
        assert_eq!(
            client.rest_url("urls"),
            "https://project.supabase.co/rest/v1/urls"
        );
        assert_eq!(
            client.object_url("thumbnails", "thumbnails/1_abc.png"),
            "https://project.supabase.co/storage/v1/object/thumbnails/thumbnails/1_abc.png"
        );
    }

    #[test]
    fn test_public_url() {
        let client = Arc::new(SupabaseClient::new(&test_config()).unwrap());
        let blobs = SupabaseBlobStore::new(client, "thumbnails");
        assert_eq!(
            blobs.public_url("thumbnails/1_abc.png"),
            "https://project.supabase.co/storage/v1/object/public/thumbnails/thumbnails/1_abc.png"
        );
    }

    #[test]
    fn test_encode_object_path() {
        assert_eq!(encode_object_path("a/b c.png"), "a/b%20c.png");
        assert_eq!(encode_object_path("/leading//double"), "leading/double");
    }

    #[test]
    fn test_row_deserialization_ignores_extra_columns() {
        let json = r#"[{"id":7,"created_at":"2024-01-01T00:00:00Z","short_code":"abc123",
            "original_url":"https://example.com","description":null,"thumbnail_url":null}]"#;
        let rows: Vec<LinkRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].short_code, "abc123");
        assert_eq!(rows[0].description, None);
    }
}
