// Scalar cell values and numeric normalization
use serde::{Deserialize, Serialize};

/// One cell of a data source row, as it arrives from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// String form used by filters and grouping labels.
    ///
    /// Whole numbers render without a fractional part, so `5.0` groups and
    /// filters as `"5"`.
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => format_number_text(*n),
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(s) => s.is_empty(),
            Scalar::Bool(_) | Scalar::Number(_) => false,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

fn format_number_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Coerce a cell into a number.
///
/// Strings are read in Brazilian notation: `R$`, whitespace and the `.`
/// thousands separator are stripped and `,` becomes the decimal point.
/// Anything that does not parse to a finite number yields `0.0`.
pub fn normalize_value(value: Option<&Scalar>) -> f64 {
    match value {
        Some(Scalar::Number(n)) if n.is_finite() => *n,
        Some(Scalar::Text(s)) => normalize_text(s),
        _ => 0.0,
    }
}

fn normalize_text(raw: &str) -> f64 {
    let cleaned: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}
