// Aggregation output models
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

impl SeriesPoint {
    pub fn new(label: String, value: f64, percent: Option<f64>) -> Self {
        Self {
            label,
            value,
            percent,
        }
    }
}

pub type AggregatedSeries = Vec<SeriesPoint>;

/// Result of computing one widget, matched on by the render layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "data", rename_all = "lowercase")]
pub enum WidgetData {
    /// Title and divider widgets.
    Layout,
    Scalar(SeriesPoint),
    Series(AggregatedSeries),
}

impl WidgetData {
    pub fn points(&self) -> &[SeriesPoint] {
        match self {
            WidgetData::Layout => &[],
            WidgetData::Scalar(point) => std::slice::from_ref(point),
            WidgetData::Series(series) => series,
        }
    }
}
