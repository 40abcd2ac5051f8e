//! Storage backend implementations

mod memory;
mod supabase;

pub use memory::{MemoryBlobStore, MemoryLinkStore};
pub use supabase::{SupabaseBlobStore, SupabaseClient, SupabaseLinkStore};
