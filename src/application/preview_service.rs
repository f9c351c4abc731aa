// Preview service - Use case for rendering dashboards against live sources
use crate::application::data_source_repository::{DataSourceRepository, SourceError};
use crate::application::widget_engine::{RenderedWidget, WidgetEngine};
use crate::domain::dashboard::DashboardInstance;
use crate::domain::data_source::DataSource;
use crate::domain::layout::{pack, Breakpoint, Placement};
use crate::domain::widget::WidgetConfig;
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct PlacedWidget {
    pub placement: Placement,
    #[serde(flatten)]
    pub widget: RenderedWidget,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardPreview {
    pub instance_id: String,
    pub name: String,
    pub breakpoint: Breakpoint,
    pub widgets: Vec<PlacedWidget>,
    /// Indexes of widgets left out because their source could not be loaded.
    pub unavailable: Vec<usize>,
}

#[derive(Clone)]
pub struct PreviewService {
    repository: Arc<dyn DataSourceRepository>,
    engine: WidgetEngine,
}

impl PreviewService {
    pub fn new(repository: Arc<dyn DataSourceRepository>, engine: WidgetEngine) -> Self {
        Self { repository, engine }
    }

    pub async fn preview_widget(
        &self,
        config: &WidgetConfig,
        source_id: &str,
    ) -> Result<RenderedWidget, SourceError> {
        if config.kind.is_layout() {
            return Ok(self.engine.render_layout(0, config));
        }
        let source = self.repository.load_source(source_id).await?;
        Ok(self.engine.render(0, config, &source))
    }

    pub async fn preview_dashboard(
        &self,
        instance: &DashboardInstance,
        breakpoint: Breakpoint,
    ) -> DashboardPreview {
        let sources = self.load_sources(&instance.required_sources()).await;

        let sizes: Vec<_> = instance.widgets.iter().map(|w| w.size).collect();
        let placements = pack(&sizes, breakpoint);

        let mut widgets = Vec::with_capacity(instance.widgets.len());
        let mut unavailable = Vec::new();

        for (index, (config, placement)) in instance.widgets.iter().zip(placements).enumerate() {
            let rendered = if config.kind.is_layout() {
                Some(self.engine.render_layout(index, config))
            } else {
                config
                    .source_ref
                    .as_ref()
                    .and_then(|r| sources.get(r))
                    .map(|source| self.engine.render(index, config, source))
            };

            match rendered {
                Some(widget) => widgets.push(PlacedWidget { placement, widget }),
                None => {
                    tracing::warn!("Skipping widget {} ('{}'): source unavailable", index, config.title);
                    unavailable.push(index);
                }
            }
        }

        DashboardPreview {
            instance_id: instance.id.clone(),
            name: instance.name.clone(),
            breakpoint,
            widgets,
            unavailable,
        }
    }

    /// Load every distinct source once, concurrently. Failures are logged and omitted.
    async fn load_sources(&self, ids: &[String]) -> HashMap<String, DataSource> {
        let results = join_all(ids.iter().map(|id| self.repository.load_source(id))).await;

        ids.iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(source) => Some((id.clone(), source)),
                Err(e) => {
                    tracing::error!("Error loading source {}: {}", id, e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::data_source::record;
    use crate::domain::scalar::Scalar;
    use crate::domain::series::WidgetData;
    use crate::domain::widget::{WidgetKind, WidgetSize};
    use crate::infrastructure::memory_repository::MemorySourceRepository;
    use chrono::Utc;

    fn leads() -> DataSource {
        DataSource::new(
            "leads",
            "leads:v1",
            vec![
                record([("origem", Scalar::from("site")), ("valor", Scalar::Number(10.0))]),
                record([("origem", Scalar::from("indicação")), ("valor", Scalar::Number(30.0))]),
            ],
        )
    }

    fn service() -> PreviewService {
        let repo = MemorySourceRepository::new(vec![leads()]);
        PreviewService::new(Arc::new(repo), WidgetEngine::default())
    }

    fn widget(kind: WidgetKind, source_ref: &str, size: WidgetSize) -> WidgetConfig {
        let mut widget = WidgetConfig::new(kind, "Leads");
        widget.size = size;
        widget.source_ref = Some(source_ref.to_string());
        widget.column_x = Some("origem".to_string());
        widget.column_y = Some("valor".to_string());
        widget
    }

    fn instance(widgets: Vec<WidgetConfig>) -> DashboardInstance {
        DashboardInstance {
            id: "i1".to_string(),
            name: "Painel".to_string(),
            unit_tag: "u1".to_string(),
            model_id: "m1".to_string(),
            created_at: Utc::now(),
            widgets,
        }
    }

    #[tokio::test]
    async fn test_preview_dashboard_renders_and_places() {
        let instance = instance(vec![
            WidgetConfig::new(WidgetKind::Title, "Comercial"),
            widget(WidgetKind::Pie, "leads", WidgetSize::Wide),
            widget(WidgetKind::Value, "leads", WidgetSize::Small),
        ]);

        let preview = service().preview_dashboard(&instance, Breakpoint::Desktop).await;

        assert_eq!(preview.widgets.len(), 3);
        assert!(preview.unavailable.is_empty());
        assert_eq!(preview.widgets[1].placement.column, 1);
        assert_eq!(preview.widgets[1].placement.width, 2);
        assert_eq!(preview.widgets[2].placement.row, 1);
        assert_eq!(preview.widgets[2].placement.column, 0);
        match &preview.widgets[1].widget.data {
            WidgetData::Series(series) => assert_eq!(series.len(), 2),
            other => panic!("expected series, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_preview_skips_widgets_with_missing_source() {
        let instance = instance(vec![
            widget(WidgetKind::Bar, "leads", WidgetSize::Small),
            widget(WidgetKind::Bar, "gone", WidgetSize::Small),
        ]);

        let preview = service().preview_dashboard(&instance, Breakpoint::Mobile).await;

        assert_eq!(preview.widgets.len(), 1);
        assert_eq!(preview.unavailable, vec![1]);
    }

    #[tokio::test]
    async fn test_preview_widget() {
        let rendered = service()
            .preview_widget(&widget(WidgetKind::Value, "leads", WidgetSize::Small), "leads")
            .await
            .unwrap();
        assert_eq!(rendered.formatted[0].display_value, "40.00");

        let err = service()
            .preview_widget(&widget(WidgetKind::Value, "x", WidgetSize::Small), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
