//! Short-link resolution endpoints
//!
//! `/short/{code}` is the path form; `/api/short?shortCode=` is the query
//! form used when the responder sits behind an edge function route. Both run
//! the same [`Resolver`].

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::debug;

use crate::services::{Resolution, Resolver};

const MISSING_CODE_BODY: &str = "Short code not provided";
const NOT_FOUND_BODY: &str = "URL not found";

#[derive(Debug, Deserialize)]
pub struct ShortQuery {
    #[serde(rename = "shortCode")]
    pub short_code: Option<String>,
}

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        resolver: web::Data<Arc<Resolver>>,
    ) -> impl Responder {
        let code = path.into_inner();
        Self::respond(&req, &resolver, Some(&code)).await
    }

    pub async fn handle_query(
        req: HttpRequest,
        query: web::Query<ShortQuery>,
        resolver: web::Data<Arc<Resolver>>,
    ) -> impl Responder {
        Self::respond(&req, &resolver, query.short_code.as_deref()).await
    }

    pub async fn missing_code() -> impl Responder {
        into_response(Resolution::MissingCode)
    }

    async fn respond(req: &HttpRequest, resolver: &Resolver, code: Option<&str>) -> HttpResponse {
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        let resolution = resolver.resolve(code, user_agent).await;
        debug!("Resolved {:?} as {}", code, resolution.kind());
        into_response(resolution)
    }
}

/// Turn a resolution into the HTTP response sent to the client
pub fn into_response(resolution: Resolution) -> HttpResponse {
    let status = resolution.status();
    match resolution {
        Resolution::MissingCode => HttpResponse::build(status)
            .insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"))
            .body(MISSING_CODE_BODY),
        Resolution::NotFound => HttpResponse::build(status)
            .insert_header((header::CONTENT_TYPE, "text/plain; charset=utf-8"))
            .insert_header((header::CACHE_CONTROL, "public, max-age=60"))
            .body(NOT_FOUND_BODY),
        Resolution::Redirect(location) | Resolution::RedirectToOrigin(location) => {
            HttpResponse::build(status)
                .insert_header((header::LOCATION, location))
                .insert_header((header::CACHE_CONTROL, "no-store"))
                .finish()
        }
        Resolution::Preview(html) => HttpResponse::build(StatusCode::OK)
            .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .body(html),
    }
}

/// Resolution routes
///
/// Registered through `App::configure` so they share the root with the
/// creation and health routes.
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/short", "/short/"])
            .route(web::get().to(RedirectService::missing_code))
            .route(web::head().to(RedirectService::missing_code)),
    )
    .service(
        web::resource("/short/{code}")
            .route(web::get().to(RedirectService::handle_redirect))
            .route(web::head().to(RedirectService::handle_redirect)),
    )
    .service(
        web::resource("/api/short")
            .route(web::get().to(RedirectService::handle_query))
            .route(web::head().to(RedirectService::handle_query)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_response_headers() {
        let resp = into_response(Resolution::NotFound);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            resp.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=60"
        );
    }

    #[test]
    fn test_redirect_response_headers() {
        let resp = into_response(Resolution::Redirect("https://example.com/x".to_string()));
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://example.com/x"
        );
        assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    }
}
