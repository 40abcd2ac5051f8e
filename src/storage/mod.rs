//! Record store and blob store abstractions
//!
//! The service only ever appends records and reads them back by short code;
//! thumbnails are written once and addressed through their public URL.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::{MemoryBlobStore, MemoryLinkStore, SupabaseBlobStore, SupabaseLinkStore};
pub use models::{LinkRecord, ThumbnailFile};

/// Persistence of link records
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a new record and return it as stored
    async fn insert(&self, record: LinkRecord) -> Result<LinkRecord>;

    /// `Ok(None)` when no record carries this code
    async fn get_by_short_code(&self, code: &str) -> Result<Option<LinkRecord>>;

    fn backend_name(&self) -> &'static str;
}

/// Object storage for thumbnails
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, path: &str, file: &ThumbnailFile) -> Result<()>;

    /// Public URL of an object; does not check that the object exists
    fn public_url(&self, path: &str) -> String;

    async fn remove(&self, path: &str) -> Result<()>;
}

/// Store handles built once at startup and shared by every request
#[derive(Clone)]
pub struct Stores {
    pub links: Arc<dyn LinkStore>,
    pub blobs: Arc<dyn BlobStore>,
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StoreConfig) -> Result<Stores> {
        let stores = match config.backend {
            StoreBackend::Supabase => {
                let client = Arc::new(backend::SupabaseClient::new(config)?);
                Stores {
                    links: Arc::new(SupabaseLinkStore::new(client.clone(), &config.table)),
                    blobs: Arc::new(SupabaseBlobStore::new(client, &config.bucket)),
                }
            }
            StoreBackend::Memory => Stores {
                links: Arc::new(MemoryLinkStore::new()),
                blobs: Arc::new(MemoryBlobStore::new(&config.bucket)),
            },
        };

        info!("Using storage backend: {}", stores.links.backend_name());
        Ok(stores)
    }
}
