// Template service - Use case for instantiating dashboard models
use crate::application::data_source_repository::{DataSourceRepository, SourceError};
use crate::domain::dashboard::{remap, DashboardInstance, DashboardModel};
use crate::domain::data_source::DataSource;
use crate::domain::error::RemapError;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum InstantiateError {
    #[error(transparent)]
    Remap(#[from] RemapError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Clone)]
pub struct TemplateService {
    repository: Arc<dyn DataSourceRepository>,
}

impl TemplateService {
    pub fn new(repository: Arc<dyn DataSourceRepository>) -> Self {
        Self { repository }
    }

    /// Materialize `model`, where `selection` maps each original source ref to
    /// the id of the source that should replace it.
    pub async fn instantiate(
        &self,
        model: &DashboardModel,
        selection: &HashMap<String, String>,
        name: Option<String>,
    ) -> Result<DashboardInstance, InstantiateError> {
        let required = model.required_sources();

        let originals = try_join_all(required.iter().map(|r| self.original_tag(r))).await?;
        let originals: HashMap<String, String> = originals.into_iter().flatten().collect();

        let chosen = required
            .iter()
            .filter_map(|r| selection.get(r).map(|id| (r.clone(), id.clone())));
        let replacements = try_join_all(chosen.map(|(r, id)| self.load_replacement(r, id))).await?;
        let source_map: HashMap<String, DataSource> = replacements.into_iter().collect();

        let mut instance = remap(model, &originals, &source_map)?;
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            instance.name = name;
        }

        tracing::info!(
            "Instantiated model {} as {} with {} sources",
            model.id,
            instance.id,
            source_map.len()
        );
        Ok(instance)
    }

    /// Schema tag of an original ref; an unknown ref resolves to nothing so the
    /// remapper reports it as unresolved.
    async fn original_tag(&self, source_ref: &str) -> Result<Option<(String, String)>, SourceError> {
        match self.repository.schema_tag(source_ref).await {
            Ok(tag) => Ok(Some((source_ref.to_string(), tag))),
            Err(SourceError::NotFound(_)) => {
                tracing::warn!("Original source {} no longer exists", source_ref);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn load_replacement(
        &self,
        source_ref: String,
        id: String,
    ) -> Result<(String, DataSource), SourceError> {
        let source = self.repository.load_source(&id).await?;
        Ok((source_ref, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::{WidgetConfig, WidgetKind};
    use crate::infrastructure::memory_repository::MemorySourceRepository;

    fn widget(source_ref: &str) -> WidgetConfig {
        let mut widget = WidgetConfig::new(WidgetKind::Line, "Evolução");
        widget.source_ref = Some(source_ref.to_string());
        widget.column_x = Some("mes".to_string());
        widget.column_y = Some("total".to_string());
        widget
    }

    fn service() -> TemplateService {
        let repo = MemorySourceRepository::new(vec![
            DataSource::new("S1", "sales:v1", vec![]),
            DataSource::new("S2", "sales:v1", vec![]),
            DataSource::new("B1", "brokers:v1", vec![]),
        ]);
        TemplateService::new(Arc::new(repo))
    }

    fn model() -> DashboardModel {
        DashboardModel::new("m1", "Modelo", "u1", vec![widget("S1"), widget("S1")])
    }

    #[tokio::test]
    async fn test_instantiate_remaps_shared_reference() {
        let selection = HashMap::from([("S1".to_string(), "S2".to_string())]);
        let instance = service()
            .instantiate(&model(), &selection, Some("Filial Norte".to_string()))
            .await
            .unwrap();

        assert_eq!(instance.name, "Filial Norte");
        assert!(instance
            .widgets
            .iter()
            .all(|w| w.source_ref.as_deref() == Some("S2")));
    }

    #[tokio::test]
    async fn test_instantiate_rejects_incompatible_source() {
        let selection = HashMap::from([("S1".to_string(), "B1".to_string())]);
        let err = service()
            .instantiate(&model(), &selection, None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InstantiateError::Remap(RemapError::IncompatibleSchema { .. })
        ));
    }

    #[tokio::test]
    async fn test_instantiate_without_selection_is_unresolved() {
        let err = service()
            .instantiate(&model(), &HashMap::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InstantiateError::Remap(RemapError::UnresolvedReference { .. })
        ));
    }

    #[tokio::test]
    async fn test_instantiate_with_missing_replacement_fails_to_load() {
        let selection = HashMap::from([("S1".to_string(), "nope".to_string())]);
        let err = service()
            .instantiate(&model(), &selection, None)
            .await
            .unwrap_err();

        assert!(matches!(err, InstantiateError::Source(SourceError::NotFound(_))));
    }
}
