use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// The only persisted entity: short code → destination plus preview metadata.
///
/// Field names match the `urls` table columns, so the struct is used as the
/// wire row of the REST backend as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub short_code: String,
    pub original_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl LinkRecord {
    /// Description if it carries any visible text
    pub fn non_empty_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    pub fn non_empty_thumbnail(&self) -> Option<&str> {
        self.thumbnail_url
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// 上传的缩略图文件
#[derive(Debug, Clone)]
pub struct ThumbnailFile {
    /// Client-side file name, only its extension is kept
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ThumbnailFile {
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or("application/octet-stream")
    }
}
