// Widget aggregation: filter, group and reduce a data source for one widget
use super::data_source::{DataSource, Record};
use super::filter::apply_filters;
use super::scalar::normalize_value;
use super::series::{AggregatedSeries, SeriesPoint, WidgetData};
use super::widget::{Aggregation, WidgetConfig, WidgetKind};
use std::collections::HashMap;

pub const DEFAULT_CATEGORY_CAP: usize = 15;
pub const SCALAR_LABEL: &str = "Total";
pub const MISSING_CATEGORY_LABEL: &str = "Não Informado";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum number of distinct groups kept per grouped widget.
    pub category_cap: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            category_cap: DEFAULT_CATEGORY_CAP,
        }
    }
}

/// Reduce a list of normalized values.
///
/// `Max` is floored at zero, so an all-negative column reports `0`.
/// `Min` over no values is `0`.
pub fn reduce(aggregation: Aggregation, values: &[f64]) -> f64 {
    match aggregation {
        Aggregation::Sum => values.iter().sum(),
        Aggregation::Avg => values.iter().sum::<f64>() / values.len().max(1) as f64,
        Aggregation::Count => values.len() as f64,
        Aggregation::Max => values.iter().copied().fold(0.0, f64::max),
        Aggregation::Min => {
            if values.is_empty() {
                0.0
            } else {
                values.iter().copied().fold(f64::INFINITY, f64::min)
            }
        }
    }
}

/// Compute a widget's data from a source snapshot.
///
/// Never fails: an invalid configuration produces an empty result.
pub fn compute(config: &WidgetConfig, source: &DataSource, options: &EngineOptions) -> WidgetData {
    if let Err(e) = config.validate() {
        tracing::warn!("Widget '{}' is not computable: {}", config.title, e);
        return empty_result(config.kind);
    }

    let rows = apply_filters(&config.filters, &source.rows);
    tracing::debug!(
        "Widget '{}': {} of {} rows after {} filters",
        config.title,
        rows.len(),
        source.rows.len(),
        config.filters.len()
    );

    let column_y = config.column_y.as_deref().unwrap_or_default();
    let column_x = config.column_x.as_deref().unwrap_or_default();

    match config.kind {
        WidgetKind::Title | WidgetKind::Divider => WidgetData::Layout,
        WidgetKind::Value => WidgetData::Scalar(aggregate_scalar(&rows, column_y, config.aggregation)),
        WidgetKind::Bar | WidgetKind::Line | WidgetKind::Pie | WidgetKind::Table => {
            WidgetData::Series(aggregate_grouped(
                &rows,
                column_x,
                column_y,
                config.aggregation,
                options.category_cap,
            ))
        }
    }
}

fn empty_result(kind: WidgetKind) -> WidgetData {
    match kind {
        WidgetKind::Title | WidgetKind::Divider => WidgetData::Layout,
        WidgetKind::Value => WidgetData::Scalar(SeriesPoint::new(SCALAR_LABEL.to_string(), 0.0, None)),
        WidgetKind::Bar | WidgetKind::Line | WidgetKind::Pie | WidgetKind::Table => {
            WidgetData::Series(Vec::new())
        }
    }
}

pub fn aggregate_scalar(rows: &[&Record], column_y: &str, aggregation: Aggregation) -> SeriesPoint {
    let values: Vec<f64> = rows
        .iter()
        .map(|row| normalize_value(row.get(column_y)))
        .collect();

    SeriesPoint::new(SCALAR_LABEL.to_string(), reduce(aggregation, &values), None)
}

/// Group rows by `column_x` in first-seen order and reduce `column_y` per group.
///
/// Rows whose category falls beyond `category_cap` distinct groups are dropped.
/// Percentages are relative to the retained groups.
pub fn aggregate_grouped(
    rows: &[&Record],
    column_x: &str,
    column_y: &str,
    aggregation: Aggregation,
    category_cap: usize,
) -> AggregatedSeries {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for row in rows {
        let label = category_label(row, column_x);
        let slot = match index.get(&label) {
            Some(&slot) => slot,
            None if groups.len() < category_cap => {
                index.insert(label.clone(), groups.len());
                groups.push((label, Vec::new()));
                groups.len() - 1
            }
            None => {
                dropped += 1;
                continue;
            }
        };
        groups[slot].1.push(normalize_value(row.get(column_y)));
    }

    if dropped > 0 {
        tracing::debug!(
            "Dropped {} rows beyond the {} category cap on '{}'",
            dropped,
            category_cap,
            column_x
        );
    }

    let reduced: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(label, values)| (label, reduce(aggregation, &values)))
        .collect();
    let total: f64 = reduced.iter().map(|(_, v)| v).sum();

    reduced
        .into_iter()
        .map(|(label, value)| SeriesPoint::new(label, value, Some(percent_of(value, total))))
        .collect()
}

fn category_label(row: &Record, column_x: &str) -> String {
    match row.get(column_x) {
        Some(cell) if !cell.is_blank() => cell.as_text(),
        _ => MISSING_CATEGORY_LABEL.to_string(),
    }
}

/// Share of `total`, rounded to one decimal; `0` when the total is zero.
fn percent_of(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (value / total * 1000.0).round() / 10.0
}
