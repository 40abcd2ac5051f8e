use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum LinkpeekError {
    Validation(String),
    Upload(String),
    Persistence(String),
    NotFound(String),
    Internal(String),
    Config(String),
    FileOperation(String),
}

impl LinkpeekError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkpeekError::Validation(_) => "E001",
            LinkpeekError::Upload(_) => "E002",
            LinkpeekError::Persistence(_) => "E003",
            LinkpeekError::NotFound(_) => "E004",
            LinkpeekError::Internal(_) => "E005",
            LinkpeekError::Config(_) => "E006",
            LinkpeekError::FileOperation(_) => "E007",
        }
    }

    /// Numeric form of [`code`](Self::code), used in JSON error bodies
    pub fn code_number(&self) -> i32 {
        self.code()[1..].parse().unwrap_or(0)
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkpeekError::Validation(_) => "Validation Error",
            LinkpeekError::Upload(_) => "Upload Error",
            LinkpeekError::Persistence(_) => "Persistence Error",
            LinkpeekError::NotFound(_) => "Resource Not Found",
            LinkpeekError::Internal(_) => "Internal Error",
            LinkpeekError::Config(_) => "Configuration Error",
            LinkpeekError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkpeekError::Validation(msg)
            | LinkpeekError::Upload(msg)
            | LinkpeekError::Persistence(msg)
            | LinkpeekError::NotFound(msg)
            | LinkpeekError::Internal(msg)
            | LinkpeekError::Config(msg)
            | LinkpeekError::FileOperation(msg) => msg,
        }
    }

    /// Message safe to show to a client. Internal details never leave the process.
    pub fn public_message(&self) -> &str {
        match self {
            LinkpeekError::Internal(_)
            | LinkpeekError::Config(_)
            | LinkpeekError::FileOperation(_) => "Internal server error",
            other => other.message(),
        }
    }

    /// HTTP status used when the error is surfaced by the creation API
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkpeekError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkpeekError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkpeekError::Upload(_) | LinkpeekError::Persistence(_) => StatusCode::BAD_GATEWAY,
            LinkpeekError::Internal(_)
            | LinkpeekError::Config(_)
            | LinkpeekError::FileOperation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkpeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkpeekError {}

// 便捷的构造函数
impl LinkpeekError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkpeekError::Validation(msg.into())
    }

    pub fn upload<T: Into<String>>(msg: T) -> Self {
        LinkpeekError::Upload(msg.into())
    }

    pub fn persistence<T: Into<String>>(msg: T) -> Self {
        LinkpeekError::Persistence(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkpeekError::NotFound(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        LinkpeekError::Internal(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkpeekError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkpeekError::FileOperation(msg.into())
    }
}

impl From<std::io::Error> for LinkpeekError {
    fn from(err: std::io::Error) -> Self {
        LinkpeekError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkpeekError {
    fn from(err: serde_json::Error) -> Self {
        LinkpeekError::Internal(format!("serialization failed: {}", err))
    }
}

impl From<config::ConfigError> for LinkpeekError {
    fn from(err: config::ConfigError) -> Self {
        LinkpeekError::Config(err.to_string())
    }
}

impl From<askama::Error> for LinkpeekError {
    fn from(err: askama::Error) -> Self {
        LinkpeekError::Internal(format!("template rendering failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, LinkpeekError>;
