//! Link creation endpoints
//!
//! `POST /api/links` answers JSON; `GET /` and `POST /` serve the HTML form.
//! Both read the same multipart fields and run [`LinkService::create_link`].

use std::sync::Arc;

use actix_multipart::{Field, Multipart};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, Responder, web};
use askama::Template;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::templates::{IndexTemplate, ResultTemplate};
use crate::errors::{LinkpeekError, Result};
use crate::services::{CreateLinkRequest, LinkService};
use crate::storage::ThumbnailFile;

/// 文本字段上限，防止超大表单占用内存
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// 统一 JSON 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub struct LinkApiService;

impl LinkApiService {
    /// POST /api/links
    pub async fn create_link(
        payload: Multipart,
        link_service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        info!("API: create link request");

        let result = match read_create_request(payload, max_file_bytes(&link_service)).await {
            Ok(req) => link_service.create_link(req).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(link) => HttpResponse::Created().json(ApiResponse {
                code: 0,
                message: "OK".to_string(),
                data: Some(link),
            }),
            Err(e) => error_json(&e),
        }
    }

    /// GET /
    pub async fn index() -> impl Responder {
        html_page(StatusCode::OK, IndexTemplate.render())
    }

    /// POST /
    pub async fn submit_form(
        payload: Multipart,
        link_service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        info!("Form: create link request");

        let result = match read_create_request(payload, max_file_bytes(&link_service)).await {
            Ok(req) => link_service.create_link(req).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(link) => html_page(
                StatusCode::CREATED,
                ResultTemplate {
                    link: Some(&link),
                    error: "",
                }
                .render(),
            ),
            Err(e) => html_page(
                e.http_status(),
                ResultTemplate {
                    link: None,
                    error: e.public_message(),
                }
                .render(),
            ),
        }
    }
}

fn max_file_bytes(link_service: &LinkService) -> usize {
    link_service.settings().max_thumbnail_bytes
}

fn error_json(e: &LinkpeekError) -> HttpResponse {
    if e.http_status().is_server_error() {
        error!("Link creation failed: {}", e);
    } else {
        warn!("Link creation rejected: {}", e);
    }

    HttpResponse::build(e.http_status()).json(ApiResponse::<()> {
        code: e.code_number(),
        message: e.public_message().to_string(),
        data: None,
    })
}

fn html_page(status: StatusCode, rendered: askama::Result<String>) -> HttpResponse {
    match rendered {
        Ok(body) => HttpResponse::build(status)
            .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
            .body(body),
        Err(e) => {
            error!("Failed to render page: {}", e);
            HttpResponse::InternalServerError()
                .insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Internal server error")
        }
    }
}

/// Collect the creation fields from a multipart body
///
/// 未知字段被忽略；未选择文件时浏览器会发送空的 file part，视为没有缩略图。
pub async fn read_create_request(
    mut payload: Multipart,
    max_file_bytes: usize,
) -> Result<CreateLinkRequest> {
    let mut original_url: Option<String> = None;
    let mut description: Option<String> = None;
    let mut thumbnail: Option<ThumbnailFile> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            LinkpeekError::validation(format!("Invalid multipart data: {}", e))
        })?;

        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "original_url" | "originalUrl" => {
                original_url = Some(read_text(&mut field).await?);
            }
            "description" => {
                description = Some(read_text(&mut field).await?);
            }
            "thumbnail" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("")
                    .to_string();
                let content_type = field.content_type().map(|m| m.to_string());
                let data = read_limited(&mut field, max_file_bytes, "Thumbnail").await?;

                if !data.is_empty() {
                    thumbnail = Some(ThumbnailFile {
                        file_name,
                        content_type,
                        data,
                    });
                }
            }
            _ => {
                // 忽略未知字段，但要读完
                while let Some(chunk) = field.next().await {
                    chunk.map_err(|e| {
                        LinkpeekError::validation(format!("Invalid multipart data: {}", e))
                    })?;
                }
            }
        }
    }

    Ok(CreateLinkRequest {
        original_url: original_url.unwrap_or_default(),
        description,
        thumbnail,
    })
}

async fn read_text(field: &mut Field) -> Result<String> {
    let data = read_limited(field, MAX_TEXT_FIELD_BYTES, "Text field").await?;
    String::from_utf8(data.to_vec())
        .map_err(|_| LinkpeekError::validation("Form fields must be valid UTF-8"))
}

async fn read_limited(field: &mut Field, limit: usize, what: &str) -> Result<Bytes> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk.map_err(|e| {
            LinkpeekError::validation(format!("Failed to read {}: {}", what.to_lowercase(), e))
        })?;
        if data.len() + bytes.len() > limit {
            return Err(LinkpeekError::validation(format!(
                "{} exceeds maximum size of {} bytes",
                what, limit
            )));
        }
        data.extend_from_slice(&bytes);
    }
    Ok(data.freeze())
}

pub fn link_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(LinkApiService::index))
            .route(web::post().to(LinkApiService::submit_form)),
    )
    .service(web::resource("/api/links").route(web::post().to(LinkApiService::create_link)));
}

