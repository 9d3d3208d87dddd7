pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;

// OpenAPI / Swagger UI
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use state::AppState;

/// Build the full router: account routes, health, docs.
pub fn build_router(state: Arc<AppState>) -> Router {
    let account_routes = Router::new()
        .route("/info", get(handlers::get_account_info))
        .route("/deposit", post(handlers::deposit))
        .route("/refund", post(handlers::request_refund))
        .route("/add-ledger", post(handlers::add_ledger))
        .route("/retrieve-funds", post(handlers::retrieve_funds))
        .route("/delete-ledger", delete(handlers::delete_ledger));

    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/account", account_routes);

    // [SECURITY] Simulation routes - only compiled when 'mock-api' feature is enabled.
    // Production builds MUST be compiled with `--no-default-features` to exclude this.
    #[cfg(feature = "mock-api")]
    let app = app.nest(
        "/internal/mock",
        Router::new().route("/sub-account", post(handlers::mock::fund_sub_account)),
    );

    app.with_state(state)
        // Stateless, added after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start HTTP Gateway server
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let broker = state.broker.name();
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.port
        )
    })?;

    tracing::info!("🚀 Gateway listening on http://{}", addr);
    tracing::info!("📖 API Docs: http://{}/docs", addr);
    tracing::info!("🏦 Broker: {}", broker);

    axum::serve(listener, app).await?;
    Ok(())
}
