use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use tracing::trace;

use crate::storage::LinkStore;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        (chrono::Utc::now() - self.start_datetime).num_seconds().max(0) as u64
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub uptime_secs: u64,
}

/// Liveness only: the record store is not queried, so a slow upstream does
/// not fail the probe.
pub struct HealthService;

impl HealthService {
    pub async fn liveness_check(
        links: web::Data<Arc<dyn LinkStore>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            backend: links.backend_name(),
            uptime_secs: app_start_time.uptime_secs(),
        })
    }
}

pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(HealthService::liveness_check))
            .route(web::head().to(HealthService::liveness_check)),
    );
}
