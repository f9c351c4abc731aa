// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use dashboard_engine::application::data_source_repository::DataSourceRepository;
use dashboard_engine::application::preview_service::PreviewService;
use dashboard_engine::application::template_service::TemplateService;
use dashboard_engine::application::widget_engine::WidgetEngine;
use dashboard_engine::infrastructure::config::{load_app_config, SourceBackend};
use dashboard_engine::infrastructure::file_repository::FileSourceRepository;
use dashboard_engine::infrastructure::http_repository::HttpSourceRepository;
use dashboard_engine::presentation::app_state::AppState;
use dashboard_engine::presentation::handlers::{
    health_check, instantiate_dashboard, list_sources, preview_dashboard, preview_widget,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn DataSourceRepository> = match config.sources.backend {
        SourceBackend::File => Arc::new(FileSourceRepository::new(&config.sources.directory)),
        SourceBackend::Http => Arc::new(HttpSourceRepository::new(
            config.sources.base_url.clone(),
            config.sources.token.clone(),
            config.sources.url_template.clone(),
            Duration::from_secs(config.sources.timeout_secs),
        )?),
    };

    // Create services (application layer)
    let engine = WidgetEngine::new(config.engine.options(), config.engine.locale);
    let preview_service = PreviewService::new(repository.clone(), engine);
    let template_service = TemplateService::new(repository.clone());

    let state = Arc::new(AppState {
        repository,
        preview_service,
        template_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/sources", get(list_sources))
        .route("/widgets/preview", post(preview_widget))
        .route("/dashboards/instantiate", post(instantiate_dashboard))
        .route("/dashboards/preview", post(preview_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting dashboard-engine on {} (category cap {}, locale {:?})",
        addr,
        config.engine.category_cap,
        config.engine.locale
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
