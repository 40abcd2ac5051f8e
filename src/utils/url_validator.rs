//! URL 验证模块
//!
//! 目标地址只允许 http / https，阻止 `javascript:` 之类的危险协议

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    ControlCharacter,
    DangerousProtocol(String),
    InvalidProtocol(String),
    InvalidFormat(String),
    MissingHost,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::ControlCharacter => write!(f, "URL contains control characters"),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::MissingHost => write!(f, "URL has no host"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// 验证 URL，成功时返回解析结果
///
/// 检查项目：
/// 1. URL 不为空，且不含控制字符
/// 2. 格式有效
/// 3. 不是危险协议
/// 4. 必须是 http / https 且带 host
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    // Url::parse 会悄悄去掉 \t \r \n，原文存储后无法作为 Location 头
    if url.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    // 先按前缀拦截，`javascript:alert(1)` 这类输入 Url::parse 也能解析成功
    let scheme = url
        .split_once(':')
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .unwrap_or_default();
    if DANGEROUS_PROTOCOLS.contains(&scheme.as_str()) {
        return Err(UrlValidationError::DangerousProtocol(format!("{}:", scheme)));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::InvalidProtocol(format!("{}:", other))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(parsed)
}

/// 获取 URL 验证错误的用户友好消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "Original URL is required",
        UrlValidationError::ControlCharacter => "URL must not contain control characters",
        UrlValidationError::DangerousProtocol(_) => "This URL protocol is not allowed",
        UrlValidationError::InvalidProtocol(_) => "URL must start with http:// or https://",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
        UrlValidationError::MissingHost => "URL must include a host name",
    }
}
