// Locale-aware rendering of aggregated values and labels
use super::series::{SeriesPoint, WidgetData};
use super::widget::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_format::{CustomFormat, Grouping, ToFormattedString};
use serde::{Deserialize, Serialize};

const NUMBER_FRACTION_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    fn decimal_separator(self) -> &'static str {
        match self {
            Locale::PtBr => ",",
            Locale::EnUs => ".",
        }
    }

    fn group_separator(self) -> &'static str {
        match self {
            Locale::PtBr => ".",
            Locale::EnUs => ",",
        }
    }

    fn currency_prefix(self) -> &'static str {
        match self {
            Locale::PtBr => "R$ ",
            Locale::EnUs => "$",
        }
    }

    fn date_pattern(self) -> &'static str {
        match self {
            Locale::PtBr => "%d/%m/%Y",
            Locale::EnUs => "%m/%d/%Y",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedPoint {
    pub label: String,
    pub value: f64,
    pub display_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_percent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SeriesFormatter {
    locale: Locale,
    grouping: CustomFormat,
}

impl SeriesFormatter {
    pub fn new(locale: Locale) -> Self {
        let grouping = CustomFormat::builder()
            .grouping(Grouping::Standard)
            .separator(locale.group_separator())
            .minus_sign("-")
            .build()
            .unwrap_or_default();
        Self { locale, grouping }
    }

    pub fn currency(&self, value: f64) -> String {
        let Some(parts) = FixedParts::split(value, 2) else {
            return out_of_range(value);
        };
        format!(
            "{}{}{}{}{:02}",
            parts.sign(),
            self.locale.currency_prefix(),
            parts.integer.to_formatted_string(&self.grouping),
            self.locale.decimal_separator(),
            parts.fraction
        )
    }

    /// Grouped integer part with up to three fraction digits, trailing zeros dropped.
    pub fn number(&self, value: f64) -> String {
        let Some(parts) = FixedParts::split(value, NUMBER_FRACTION_DIGITS as u32) else {
            return out_of_range(value);
        };
        let integer = parts.integer.to_formatted_string(&self.grouping);
        let fraction = format!("{:0width$}", parts.fraction, width = NUMBER_FRACTION_DIGITS);
        let fraction = fraction.trim_end_matches('0');

        if fraction.is_empty() {
            format!("{}{}", parts.sign(), integer)
        } else {
            format!(
                "{}{}{}{}",
                parts.sign(),
                integer,
                self.locale.decimal_separator(),
                fraction
            )
        }
    }

    pub fn percent(&self, percent: f64) -> String {
        format!("{}%", self.number(percent))
    }

    /// Format an aggregated value. `scalar` selects the two-decimal fallback
    /// used by KPI widgets whose type is neither currency nor number.
    pub fn value(&self, value: f64, data_type: DataType, scalar: bool) -> String {
        match data_type {
            DataType::Currency => self.currency(value),
            DataType::Number => self.number(value),
            DataType::Text | DataType::Date if scalar => format!("{:.2}", value),
            DataType::Text | DataType::Date => self.number(value),
        }
    }

    /// Format a category label; dates are re-rendered, unparsable dates kept raw.
    pub fn label(&self, label: &str, data_type: DataType) -> String {
        match data_type {
            DataType::Date => parse_date(label)
                .map(|d| d.format(self.locale.date_pattern()).to_string())
                .unwrap_or_else(|| label.to_string()),
            DataType::Text | DataType::Number | DataType::Currency => label.to_string(),
        }
    }

    pub fn point(&self, point: &SeriesPoint, data_type: DataType, scalar: bool) -> FormattedPoint {
        FormattedPoint {
            label: self.label(&point.label, data_type),
            value: point.value,
            display_value: self.value(point.value, data_type, scalar),
            display_percent: point.percent.map(|p| self.percent(p)),
        }
    }

    pub fn format_data(&self, data: &WidgetData, data_type: DataType) -> Vec<FormattedPoint> {
        let scalar = matches!(data, WidgetData::Scalar(_));
        data.points()
            .iter()
            .map(|p| self.point(p, data_type, scalar))
            .collect()
    }
}

impl Default for SeriesFormatter {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

/// Largest magnitude whose integer part fits a `u128`.
const MAX_FIXED_MAGNITUDE: f64 = 1e38;

/// A value split into sign, integer part and rounded fraction digits.
struct FixedParts {
    negative: bool,
    integer: u128,
    fraction: u64,
}

impl FixedParts {
    /// `None` for values that are not finite or too large to split exactly.
    fn split(value: f64, digits: u32) -> Option<Self> {
        let magnitude = value.abs();
        if !magnitude.is_finite() || magnitude >= MAX_FIXED_MAGNITUDE {
            return None;
        }

        let scale = 10u64.pow(digits);
        let mut integer = magnitude.trunc() as u128;
        let mut fraction = (magnitude.fract() * scale as f64).round() as u64;
        if fraction >= scale {
            integer += 1;
            fraction = 0;
        }

        Some(Self {
            // Values that round to zero print without a sign.
            negative: value < 0.0 && (integer > 0 || fraction > 0),
            integer,
            fraction,
        })
    }

    fn sign(&self) -> &'static str {
        if self.negative { "-" } else { "" }
    }
}

fn out_of_range(value: f64) -> String {
    if value.is_finite() {
        format!("{:e}", value)
    } else {
        value.to_string()
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map(|dt| dt.date())
}
