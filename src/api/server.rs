//! API server implementation
//!
//! HTTP server using Axum. Exposes the template fill endpoint plus health
//! and info endpoints. Startup loads the cell mapping and validates the
//! template; either failing aborts startup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::{AppEnv, Settings};
use crate::error::PlantillaResult;
use crate::excel::validate_template;
use crate::mapping::load_cell_mapping;
use crate::types::CellMapping;

use super::handlers;

/// API server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    pub version: String,
    pub settings: Settings,
    pub mapping: CellMapping,
}

/// Build the service router with CORS and request tracing
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Core endpoint
        .route("/fill-template", post(handlers::fill_template))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
///
/// Initializes tracing, loads the startup configuration, and serves until a
/// shutdown signal arrives.
pub async fn run_api_server(config: ApiConfig, settings: Settings) -> anyhow::Result<()> {
    init_tracing(settings.env);
    info!("Deployment environment: {}", settings.env);

    let state = Arc::new(build_state(settings)?);
    let app = build_router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📄 Plantilla server starting on http://{}", addr);
    info!("   Endpoints: POST /fill-template");
    info!("   Health: /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Plantilla server shutdown complete");
    Ok(())
}

/// Load the mapping and validate the template, failing startup on error
fn build_state(settings: Settings) -> PlantillaResult<AppState> {
    let mapping = match load_cell_mapping(&settings.mapping_path()) {
        Ok(mapping) => {
            info!("Cell mapping configuration loaded successfully");
            mapping
        }
        Err(e) => {
            error!("Failed to load cell mapping: {e}");
            return Err(e);
        }
    };

    match validate_template(&settings.template_path(), &settings.sheet_name) {
        Ok(()) => info!("Template file validated successfully"),
        Err(e) => {
            error!("Template validation failed: {e}");
            return Err(e);
        }
    }

    Ok(AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        settings,
        mapping,
    })
}

fn init_tracing(env: AppEnv) {
    let default_filter = if env.is_debug() {
        "plantilla=debug,tower_http=debug"
    } else {
        "plantilla=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
