use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::errors::{LinkpeekError, Result};
use crate::services::crawler::DEFAULT_CRAWLER_PATTERNS;
use crate::utils::url_validator::validate_url;

/// 默认配置文件名
pub const DEFAULT_CONFIG_PATH: &str = "linkpeek.toml";

/// 环境变量前缀，例如 `LINKPEEK__STORE__URL`
pub const ENV_PREFIX: &str = "LINKPEEK";

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StoreBackend {
    /// PostgREST table + Storage bucket over HTTPS
    #[default]
    Supabase,
    /// In-process maps, lost on restart
    Memory,
}

/// How a found link is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponsePolicy {
    /// Crawlers get the preview page, browsers get a bare 307
    #[default]
    BotGated,
    /// Everyone gets the preview page with a script redirect
    UnconditionalHtml,
}

/// How an unknown code (or an internal failure) is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FallbackPolicy {
    /// 404 with a plain-text body
    #[default]
    NotFound,
    /// 307 to the service's own root
    RedirectToOrigin,
}

macro_rules! impl_display_via_as_ref {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_ref())
            }
        })*
    };
}

impl_display_via_as_ref!(StoreBackend, ResponsePolicy, FallbackPolicy);

/// 静态配置（从 TOML + 环境变量加载，启动时使用）
///
/// - server: 监听地址、端口、对外 origin
/// - store: 记录表与缩略图存储
/// - links: 短码生成与上传限制
/// - preview: 预览页 / 回退策略
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML > 默认值
    /// ENV 前缀：LINKPEEK，分隔符：__
    /// 示例：LINKPEEK__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let explicit = path.is_some();
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            // 显式指定的配置文件必须存在
            .add_source(File::with_name(path).required(explicit))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("preview.crawler_patterns")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// Startup checks. Anything that fails here is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.store.backend == StoreBackend::Supabase {
            if self.store.url.trim().is_empty() {
                return Err(LinkpeekError::config(format!(
                    "store.url is required (set {}__STORE__URL)",
                    ENV_PREFIX
                )));
            }
            if self.store.key.trim().is_empty() {
                return Err(LinkpeekError::config(format!(
                    "store.key is required (set {}__STORE__KEY)",
                    ENV_PREFIX
                )));
            }
            validate_url(&self.store.url)
                .map_err(|e| LinkpeekError::config(format!("store.url: {}", e)))?;
        }

        validate_url(&self.server.public_origin)
            .map_err(|e| LinkpeekError::config(format!("server.public_origin: {}", e)))?;

        if !(4..=32).contains(&self.links.code_length) {
            return Err(LinkpeekError::config(format!(
                "links.code_length must be between 4 and 32, got {}",
                self.links.code_length
            )));
        }
        if self.links.max_code_attempts == 0 {
            return Err(LinkpeekError::config(
                "links.max_code_attempts must be at least 1",
            ));
        }

        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// Externally visible origin, used to build short URLs
    #[serde(default = "default_public_origin")]
    pub public_origin: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_thumbnail_prefix")]
    pub thumbnail_prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// key 不能出现在日志里
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("url", &self.url)
            .field("key", &if self.key.is_empty() { "" } else { "***" })
            .field("table", &self.table)
            .field("bucket", &self.bucket)
            .field("thumbnail_prefix", &self.thumbnail_prefix)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: u32,
    #[serde(default = "default_max_thumbnail_bytes")]
    pub max_thumbnail_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub response_policy: ResponsePolicy,
    #[serde(default)]
    pub fallback_policy: FallbackPolicy,
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default = "default_crawler_patterns")]
    pub crawler_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_public_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_table() -> String {
    "urls".to_string()
}

fn default_bucket() -> String {
    "thumbnails".to_string()
}

fn default_thumbnail_prefix() -> String {
    "thumbnails".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_code_length() -> usize {
    6
}

fn default_max_code_attempts() -> u32 {
    5
}

fn default_max_thumbnail_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_title() -> String {
    "Shared Link".to_string()
}

fn default_crawler_patterns() -> Vec<String> {
    DEFAULT_CRAWLER_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_enable_rotation() -> bool {
    true
}

fn default_max_backups() -> u32 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            public_origin: default_public_origin(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            key: String::new(),
            table: default_table(),
            bucket: default_bucket(),
            thumbnail_prefix: default_thumbnail_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            max_code_attempts: default_max_code_attempts(),
            max_thumbnail_bytes: default_max_thumbnail_bytes(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            response_policy: ResponsePolicy::default(),
            fallback_policy: FallbackPolicy::default(),
            default_title: default_title(),
            crawler_patterns: default_crawler_patterns(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            enable_rotation: default_enable_rotation(),
            max_backups: default_max_backups(),
        }
    }
}
