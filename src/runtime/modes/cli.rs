//! CLI mode
//!
//! One-shot commands that run the creation flow or the resolution responder
//! against the configured stores, without starting the HTTP server.

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use colored::Colorize;

use crate::runtime::lifetime::AppContext;
use crate::services::{CreateLinkRequest, Resolution};
use crate::storage::ThumbnailFile;

/// `linkpeek create`
pub async fn create_link(
    ctx: &AppContext,
    url: String,
    description: Option<String>,
    thumbnail: Option<String>,
) -> Result<()> {
    let thumbnail = match thumbnail {
        Some(path) => Some(read_thumbnail(Path::new(&path)).await?),
        None => None,
    };

    let result = ctx
        .link_service
        .create_link(CreateLinkRequest {
            original_url: url,
            description,
            thumbnail,
        })
        .await
        .map_err(|e| anyhow::anyhow!(e.format_colored()))?;

    println!("{} {}", "✓ Created".green().bold(), result.short_url.cyan());
    println!("  code:        {}", result.short_code);
    println!("  target:      {}", result.original_url);
    if let Some(description) = &result.description {
        println!("  description: {}", description);
    }
    if let Some(thumbnail_url) = &result.thumbnail_url {
        println!("  thumbnail:   {}", thumbnail_url);
    }
    Ok(())
}

/// `linkpeek resolve`
pub async fn resolve_code(ctx: &AppContext, code: String, user_agent: String) -> Result<()> {
    let resolution = ctx.resolver.resolve(Some(&code), &user_agent).await;

    println!(
        "{} {}",
        "status:".bold(),
        resolution.status().as_u16().to_string().yellow()
    );
    match resolution {
        Resolution::Redirect(location) | Resolution::RedirectToOrigin(location) => {
            println!("{} {}", "location:".bold(), location.cyan());
        }
        Resolution::Preview(html) => {
            println!("{}", "content-type: text/html; charset=utf-8".bold());
            println!();
            println!("{}", html);
        }
        Resolution::NotFound => println!("URL not found"),
        Resolution::MissingCode => println!("Short code not provided"),
    }
    Ok(())
}

/// `linkpeek config`
pub fn print_sample_config() {
    println!("{}", crate::config::StaticConfig::generate_sample_config());
}

async fn read_thumbnail(path: &Path) -> Result<ThumbnailFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read thumbnail {}", path.display()))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("thumbnail")
        .to_string();

    Ok(ThumbnailFile {
        content_type: guess_image_type(&file_name).map(String::from),
        file_name,
        data: Bytes::from(data),
    })
}

fn guess_image_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_image_type() {
        assert_eq!(guess_image_type("a.PNG"), Some("image/png"));
        assert_eq!(guess_image_type("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(guess_image_type("notes.txt"), None);
        assert_eq!(guess_image_type("noext"), None);
    }

    #[tokio::test]
    async fn test_read_thumbnail_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.webp");
        std::fs::write(&path, b"webp-bytes").unwrap();

        let file = read_thumbnail(&path).await.unwrap();
        assert_eq!(file.file_name, "cover.webp");
        assert_eq!(file.content_type.as_deref(), Some("image/webp"));
        assert_eq!(&file.data[..], b"webp-bytes");
    }
}
