//! In-process backend
//!
//! 用于本地调试和测试，重启后数据丢失。

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::errors::{LinkpeekError, Result};
use crate::storage::{BlobStore, LinkRecord, LinkStore, ThumbnailFile};

#[derive(Default)]
pub struct MemoryLinkStore {
    records: DashMap<String, LinkRecord>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert(&self, record: LinkRecord) -> Result<LinkRecord> {
        // 与数据库唯一约束一致：重复短码直接报错
        match self.records.entry(record.short_code.clone()) {
            Entry::Occupied(_) => Err(LinkpeekError::persistence(format!(
                "duplicate short code: {}",
                record.short_code
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn get_by_short_code(&self, code: &str) -> Result<Option<LinkRecord>> {
        Ok(self.records.get(code).map(|r| r.value().clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

pub struct MemoryBlobStore {
    bucket: String,
    objects: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: DashMap::new(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, file: &ThumbnailFile) -> Result<()> {
        match self.objects.entry(path.to_string()) {
            Entry::Occupied(_) => Err(LinkpeekError::upload(format!(
                "object already exists: {}",
                path
            ))),
            Entry::Vacant(slot) => {
                slot.insert(file.data.clone());
                Ok(())
            }
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://{}/{}", self.bucket, path)
    }

    async fn remove(&self, path: &str) -> Result<()> {
        self.objects.remove(path);
        Ok(())
    }
}
