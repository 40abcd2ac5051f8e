//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, health_routes, link_routes, redirect_routes};
use crate::runtime::lifetime::{AppContext, shutdown};

/// Shared state and every route, for the server and for tests
pub fn configure_app(
    ctx: AppContext,
    app_start_time: AppStartTime,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ctx.stores.links.clone()))
            .app_data(web::Data::new(ctx.link_service.clone()))
            .app_data(web::Data::new(ctx.resolver.clone()))
            .app_data(web::Data::new(app_start_time));
        health_routes(cfg);
        link_routes(cfg);
        redirect_routes(cfg);
    }
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(ctx: AppContext) -> Result<()> {
    let app_start_time = AppStartTime::now();

    let server_config = ctx.config.server.clone();
    let cpu_count = server_config.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .configure(configure_app(ctx.clone(), app_start_time.clone()))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .disable_signals()
    .workers(cpu_count);

    let bind_address = format!("{}:{}", server_config.host, server_config.port);
    warn!("Starting server at http://{}", bind_address);
    warn!("Public origin: {}", server_config.public_origin);

    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown: server stopped");
        }
    }

    Ok(())
}
