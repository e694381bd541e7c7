mod routes;
mod controllers;
mod services;
mod models;
mod api_docs;
mod shared_state;
mod config;
mod error;

use std::net::SocketAddr;
use std::process::ExitCode;
use axum::{Router, routing::get, response::Html};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::routes::api_routes::api_routes;
use crate::shared_state::AppState;

const CONFIG_ENV: &str = "SOLAR_ROI_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 1. Load configuration
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.json".to_owned());
    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // 2. Reference tables + estimator
    let state = AppState::new(&config);
    let summary = state.tables().summary();
    info!(
        regions = summary.regions,
        suppliers = summary.suppliers,
        home_types = summary.home_types,
        "reference tables ready"
    );

    // 3. HTTP server: API, docs, form assets
    let app = Router::new()
        .nest("/api", api_routes(state.clone()))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new(&config.presentation.static_dir))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    if let Err(e) = axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
    {
        error!(error = %e, "server terminated");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// A configuration that cannot be loaded is fatal: the process must exit
/// non-zero so a supervisor sees the failed start.
fn load_config(path: &str) -> Result<Config, ExitCode> {
    Config::load(path).map_err(|e| {
        error!(path = %path, error = %e, "failed to load configuration");
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_config_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ \"server\": ").unwrap();
        let code = load_config(path.to_str().unwrap()).unwrap_err();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn missing_config_starts_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 8501);
    }
}
