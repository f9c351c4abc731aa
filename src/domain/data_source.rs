// Data source domain model
use super::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Record = HashMap<String, Scalar>;

/// A materialized, schema-tagged table of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub schema_tag: String,
    #[serde(default)]
    pub rows: Vec<Record>,
}

impl DataSource {
    pub fn new(id: &str, schema_tag: &str, rows: Vec<Record>) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            schema_tag: schema_tag.to_string(),
            rows,
        }
    }

    /// Two sources are interchangeable only when their schema tags match.
    pub fn is_compatible_with(&self, schema_tag: &str) -> bool {
        self.schema_tag == schema_tag
    }
}

/// Build a record from `(column, value)` pairs.
pub fn record<I, K, V>(cells: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Scalar>,
{
    cells
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
