// Dashboard model (template) and instance domain models
use super::data_source::DataSource;
use super::error::RemapError;
use super::widget::WidgetConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Reusable widget template. The engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit_tag: String,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

impl DashboardModel {
    pub fn new(id: &str, name: &str, unit_tag: &str, widgets: Vec<WidgetConfig>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            unit_tag: unit_tag.to_string(),
            widgets,
        }
    }

    /// Distinct source refs of data widgets, in first-seen order.
    pub fn required_sources(&self) -> Vec<String> {
        distinct_source_refs(&self.widgets)
    }
}

/// A model materialized against concrete data sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardInstance {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit_tag: String,
    pub model_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub widgets: Vec<WidgetConfig>,
}

impl DashboardInstance {
    pub fn required_sources(&self) -> Vec<String> {
        distinct_source_refs(&self.widgets)
    }
}

fn distinct_source_refs(widgets: &[WidgetConfig]) -> Vec<String> {
    let mut seen = HashSet::new();
    widgets
        .iter()
        .filter(|w| !w.kind.is_layout())
        .filter_map(|w| w.source_ref.clone())
        .filter(|r| seen.insert(r.clone()))
        .collect()
}

/// Copy `model` into a new instance, pointing each original source ref at its
/// replacement in `source_map`.
///
/// `originals` gives the schema tag of every original ref. Widgets sharing an
/// original ref always end up sharing the replacement.
pub fn remap(
    model: &DashboardModel,
    originals: &HashMap<String, String>,
    source_map: &HashMap<String, DataSource>,
) -> Result<DashboardInstance, RemapError> {
    let mut substitutions: HashMap<String, String> = HashMap::new();

    for source_ref in model.required_sources() {
        let unresolved = || RemapError::UnresolvedReference {
            source_ref: source_ref.clone(),
        };
        let expected_tag = originals.get(&source_ref).ok_or_else(unresolved)?;
        let replacement = source_map.get(&source_ref).ok_or_else(unresolved)?;

        if !replacement.is_compatible_with(expected_tag) {
            return Err(RemapError::IncompatibleSchema {
                source_ref,
                expected_tag: expected_tag.clone(),
                got_tag: replacement.schema_tag.clone(),
            });
        }

        tracing::debug!("Remapping source {} -> {}", source_ref, replacement.id);
        substitutions.insert(source_ref, replacement.id.clone());
    }

    for unused in source_map.keys().filter(|k| !substitutions.contains_key(*k)) {
        tracing::debug!("Ignoring selection for unused source {}", unused);
    }

    let widgets = model
        .widgets
        .iter()
        .map(|widget| {
            let mut copy = widget.clone();
            if !copy.kind.is_layout() {
                if let Some(new_ref) = copy.source_ref.as_ref().and_then(|r| substitutions.get(r)) {
                    copy.source_ref = Some(new_ref.clone());
                }
            }
            copy
        })
        .collect();

    Ok(DashboardInstance {
        id: uuid::Uuid::new_v4().to_string(),
        name: model.name.clone(),
        unit_tag: model.unit_tag.clone(),
        model_id: model.id.clone(),
        created_at: Utc::now(),
        widgets,
    })
}
