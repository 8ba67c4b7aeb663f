// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_controller::DashboardController;
use crate::infrastructure::config::{load_app_config, load_layout_config};
use crate::infrastructure::json_rpc_backend::JsonRpcBackend;
use crate::infrastructure::svg_renderer::SvgChartRenderer;
use crate::infrastructure::web_client_dispatcher::WebClientDispatcher;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_config = load_app_config()?;
    let layout_config = load_layout_config()?;

    // Adapters (infrastructure layer)
    let backend = Arc::new(JsonRpcBackend::new(
        app_config.backend.url.clone(),
        app_config.backend.session_id.clone(),
        app_config.backend.timeout(),
    ));
    let dispatcher = Arc::new(WebClientDispatcher::new(app_config.web_client_base_url()));
    let renderer = Arc::new(SvgChartRenderer::new());

    // Controller (application layer)
    let controller = Arc::new(DashboardController::new(backend, dispatcher, renderer));

    let state = Arc::new(AppState {
        controller,
        layout: layout_config.mounted_view(),
    });

    let router = build_router(state);

    let addr: SocketAddr = app_config.server.bind.parse()?;
    tracing::info!(
        "Starting hospital dashboard on {} (backend {})",
        addr,
        app_config.backend.url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
