// HTTP request handlers
use crate::application::preview_service::DashboardPreview;
use crate::application::widget_engine::RenderedWidget;
use crate::domain::dashboard::{DashboardInstance, DashboardModel};
use crate::domain::layout::Breakpoint;
use crate::domain::widget::WidgetConfig;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct WidgetPreviewRequest {
    pub widget: WidgetConfig,
    pub source_id: String,
}

#[derive(Deserialize)]
pub struct InstantiateRequest {
    pub model: DashboardModel,
    /// Original source ref -> id of the replacement source
    #[serde(default)]
    pub selection: HashMap<String, String>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct DashboardPreviewRequest {
    pub instance: DashboardInstance,
    pub breakpoint: Option<Breakpoint>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List available data sources
pub async fn list_sources(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.repository.list_source_ids().await?))
}

/// Compute a single widget against a source, for the widget builder
pub async fn preview_widget(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WidgetPreviewRequest>,
) -> Result<Json<RenderedWidget>, ApiError> {
    let rendered = state
        .preview_service
        .preview_widget(&request.widget, &request.source_id)
        .await?;
    Ok(Json(rendered))
}

/// Materialize a dashboard model against the selected sources
pub async fn instantiate_dashboard(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InstantiateRequest>,
) -> Result<Json<DashboardInstance>, ApiError> {
    let instance = state
        .template_service
        .instantiate(&request.model, &request.selection, request.name)
        .await?;
    Ok(Json(instance))
}

/// Render every widget of an instance
pub async fn preview_dashboard(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DashboardPreviewRequest>,
) -> Json<DashboardPreview> {
    let breakpoint = request.breakpoint.unwrap_or(Breakpoint::Desktop);
    Json(
        state
            .preview_service
            .preview_dashboard(&request.instance, breakpoint)
            .await,
    )
}
