// Widget configuration domain model
use super::error::WidgetConfigError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Title,
    Divider,
    Value,
    Bar,
    Line,
    Pie,
    Table,
}

impl WidgetKind {
    /// Title and divider widgets carry no data.
    pub fn is_layout(self) -> bool {
        matches!(self, WidgetKind::Title | WidgetKind::Divider)
    }

    pub fn is_grouped(self) -> bool {
        matches!(
            self,
            WidgetKind::Bar | WidgetKind::Line | WidgetKind::Pie | WidgetKind::Table
        )
    }

    /// Key the chart layer dispatches on.
    pub fn renderer_key(self) -> &'static str {
        match self {
            WidgetKind::Title => "title",
            WidgetKind::Divider => "divider",
            WidgetKind::Value => "kpi",
            WidgetKind::Bar => "bar-chart",
            WidgetKind::Line => "line-chart",
            WidgetKind::Pie => "pie-chart",
            WidgetKind::Table => "table",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    #[default]
    Small,
    Wide,
    Tall,
    Large,
    Full,
}

/// Reduction applied to `column_y`.
///
/// Unknown names and `null` deserialize to `Sum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Aggregation {
    #[default]
    Sum,
    Avg,
    Count,
    Max,
    Min,
}

impl From<Option<String>> for Aggregation {
    fn from(value: Option<String>) -> Self {
        match value.unwrap_or_default().to_lowercase().as_str() {
            "avg" | "average" => Aggregation::Avg,
            "count" => Aggregation::Count,
            "max" => Aggregation::Max,
            "min" => Aggregation::Min,
            _ => Aggregation::Sum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Text,
    Number,
    Date,
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Include,
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    Equal,
    Contains,
    StartsWith,
    IsNull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetFilter {
    pub kind: FilterKind,
    #[serde(default)]
    pub field: String,
    pub condition: FilterCondition,
    #[serde(default)]
    pub value: String,
}

impl WidgetFilter {
    pub fn new(kind: FilterKind, field: &str, condition: FilterCondition, value: &str) -> Self {
        Self {
            kind,
            field: field.to_string(),
            condition,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "type")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub size: WidgetSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_column: Option<String>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub filters: Vec<WidgetFilter>,
}

impl WidgetConfig {
    pub fn new(kind: WidgetKind, title: &str) -> Self {
        Self {
            id: String::new(),
            kind,
            title: title.to_string(),
            size: WidgetSize::default(),
            source_ref: None,
            column_x: None,
            column_y: None,
            time_column: None,
            aggregation: Aggregation::default(),
            data_type: DataType::default(),
            filters: Vec::new(),
        }
    }

    /// Check the per-kind required fields.
    pub fn validate(&self) -> Result<(), WidgetConfigError> {
        if self.kind.is_layout() {
            return Ok(());
        }
        if is_blank(&self.source_ref) {
            return Err(WidgetConfigError::MissingSource { kind: self.kind });
        }
        if is_blank(&self.column_y) {
            return Err(WidgetConfigError::MissingColumnY { kind: self.kind });
        }
        if self.kind.is_grouped() && is_blank(&self.column_x) {
            return Err(WidgetConfigError::MissingColumnX { kind: self.kind });
        }
        Ok(())
    }

    /// Stable hash of the configuration, suitable as a memoization key.
    pub fn fingerprint(&self) -> String {
        // Struct fields serialize in declaration order, so the JSON is canonical.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::is_empty).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_widget_document() {
        let json = r#"{
            "type": "bar",
            "title": "Leads por origem",
            "size": "wide",
            "source_ref": "leads",
            "column_x": "origem",
            "column_y": "valor",
            "aggregation": "median",
            "data_type": "currency",
            "filters": [
                {"kind": "exclude", "field": "status", "condition": "starts_with", "value": "perd"}
            ]
        }"#;
        let widget: WidgetConfig = serde_json::from_str(json).unwrap();

        assert_eq!(widget.kind, WidgetKind::Bar);
        assert_eq!(widget.size, WidgetSize::Wide);
        assert_eq!(widget.aggregation, Aggregation::Sum);
        assert_eq!(widget.data_type, DataType::Currency);
        assert_eq!(widget.filters[0].condition, FilterCondition::StartsWith);
        assert!(widget.validate().is_ok());
    }

    #[test]
    fn test_null_aggregation_falls_back_to_sum() {
        let json = r#"{
            "type": "value",
            "title": "Total",
            "source_ref": "leads",
            "column_y": "valor",
            "aggregation": null
        }"#;
        let widget: WidgetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(widget.aggregation, Aggregation::Sum);

        let json = r#"{"type": "value", "source_ref": "leads", "column_y": "valor"}"#;
        let widget: WidgetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(widget.aggregation, Aggregation::Sum);

        let round_trip: WidgetConfig =
            serde_json::from_str(&serde_json::to_string(&WidgetConfig {
                aggregation: Aggregation::Max,
                ..widget
            })
            .unwrap())
            .unwrap();
        assert_eq!(round_trip.aggregation, Aggregation::Max);
    }

    #[test]
    fn test_validate_required_fields() {
        let title = WidgetConfig::new(WidgetKind::Title, "Resumo");
        assert!(title.validate().is_ok());

        let mut value = WidgetConfig::new(WidgetKind::Value, "Total");
        assert!(matches!(
            value.validate(),
            Err(WidgetConfigError::MissingSource { .. })
        ));
        value.source_ref = Some("s1".to_string());
        assert!(matches!(
            value.validate(),
            Err(WidgetConfigError::MissingColumnY { .. })
        ));
        value.column_y = Some("amount".to_string());
        assert!(value.validate().is_ok());

        let mut pie = value.clone();
        pie.kind = WidgetKind::Pie;
        assert!(matches!(
            pie.validate(),
            Err(WidgetConfigError::MissingColumnX { kind: WidgetKind::Pie })
        ));
    }

    #[test]
    fn test_fingerprint_tracks_config_changes() {
        let mut widget = WidgetConfig::new(WidgetKind::Line, "Vendas");
        let first = widget.fingerprint();
        assert_eq!(first, widget.clone().fingerprint());
        assert_eq!(first.len(), 64);

        widget.aggregation = Aggregation::Avg;
        assert_ne!(first, widget.fingerprint());
    }
}
