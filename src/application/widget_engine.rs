// Widget engine - Computes and formats widgets for the render layer
use crate::domain::aggregation::{compute, EngineOptions};
use crate::domain::data_source::DataSource;
use crate::domain::format::{FormattedPoint, Locale, SeriesFormatter};
use crate::domain::layout::{span_for, GridSpan};
use crate::domain::palette::color_for;
use crate::domain::series::WidgetData;
use crate::domain::widget::{WidgetConfig, WidgetKind};
use serde::Serialize;

/// Everything the chart layer needs to draw one widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedWidget {
    pub index: usize,
    pub id: String,
    pub kind: WidgetKind,
    pub renderer: &'static str,
    pub title: String,
    pub span: GridSpan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    pub data: WidgetData,
    pub formatted: Vec<FormattedPoint>,
}

#[derive(Debug, Clone)]
pub struct WidgetEngine {
    options: EngineOptions,
    formatter: SeriesFormatter,
}

impl WidgetEngine {
    pub fn new(options: EngineOptions, locale: Locale) -> Self {
        Self {
            options,
            formatter: SeriesFormatter::new(locale),
        }
    }

    pub fn compute(&self, config: &WidgetConfig, source: &DataSource) -> WidgetData {
        compute(config, source, &self.options)
    }

    /// Render a layout widget, which needs no data source.
    pub fn render_layout(&self, index: usize, config: &WidgetConfig) -> RenderedWidget {
        self.assemble(index, config, WidgetData::Layout)
    }

    pub fn render(&self, index: usize, config: &WidgetConfig, source: &DataSource) -> RenderedWidget {
        let data = self.compute(config, source);
        self.assemble(index, config, data)
    }

    fn assemble(&self, index: usize, config: &WidgetConfig, data: WidgetData) -> RenderedWidget {
        let formatted = self.formatter.format_data(&data, config.data_type);
        let color = match config.kind {
            WidgetKind::Bar | WidgetKind::Line | WidgetKind::Pie => Some(color_for(&config.id, index)),
            WidgetKind::Title | WidgetKind::Divider | WidgetKind::Value | WidgetKind::Table => None,
        };

        RenderedWidget {
            index,
            id: config.id.clone(),
            kind: config.kind,
            renderer: config.kind.renderer_key(),
            title: config.title.clone(),
            span: span_for(config.size),
            color,
            data,
            formatted,
        }
    }
}

impl Default for WidgetEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default(), Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::data_source::record;
    use crate::domain::layout::SpanWidth;
    use crate::domain::scalar::Scalar;
    use crate::domain::widget::{DataType, WidgetSize};

    fn sales() -> DataSource {
        DataSource::new(
            "sales",
            "sales:v1",
            vec![
                record([("uf", Scalar::from("SP")), ("valor", Scalar::from("R$ 1.000,00"))]),
                record([("uf", Scalar::from("RJ")), ("valor", Scalar::from("R$ 500,50"))]),
            ],
        )
    }

    #[test]
    fn test_render_value_widget() {
        let mut widget = WidgetConfig::new(WidgetKind::Value, "Faturamento");
        widget.source_ref = Some("sales".to_string());
        widget.column_y = Some("valor".to_string());
        widget.data_type = DataType::Currency;

        let rendered = WidgetEngine::default().render(0, &widget, &sales());

        assert_eq!(rendered.renderer, "kpi");
        assert_eq!(rendered.color, None);
        assert_eq!(rendered.formatted.len(), 1);
        assert_eq!(rendered.formatted[0].label, "Total");
        assert_eq!(rendered.formatted[0].display_value, "R$ 1.500,50");
    }

    #[test]
    fn test_render_chart_widget() {
        let mut widget = WidgetConfig::new(WidgetKind::Bar, "Por estado");
        widget.id = "by-state".to_string();
        widget.size = WidgetSize::Large;
        widget.source_ref = Some("sales".to_string());
        widget.column_x = Some("uf".to_string());
        widget.column_y = Some("valor".to_string());

        let engine = WidgetEngine::new(EngineOptions { category_cap: 1 }, Locale::EnUs);
        let rendered = engine.render(4, &widget, &sales());

        assert_eq!(rendered.renderer, "bar-chart");
        assert_eq!(rendered.span.width, SpanWidth::Columns(2));
        assert_eq!(rendered.color, Some(color_for("by-state", 0)));
        assert_eq!(rendered.formatted.len(), 1);
        assert_eq!(rendered.formatted[0].display_value, "1,000");
        assert_eq!(rendered.formatted[0].display_percent.as_deref(), Some("100%"));
    }

    #[test]
    fn test_render_layout_widget() {
        let widget = WidgetConfig::new(WidgetKind::Divider, "");
        let rendered = WidgetEngine::default().render_layout(2, &widget);

        assert_eq!(rendered.data, WidgetData::Layout);
        assert!(rendered.formatted.is_empty());
    }
}
