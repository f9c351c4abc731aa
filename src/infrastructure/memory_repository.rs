// In-memory data source repository
use crate::application::data_source_repository::{DataSourceRepository, SourceError};
use crate::domain::data_source::DataSource;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Holds sources handed over by the host application.
#[derive(Debug, Default)]
pub struct MemorySourceRepository {
    sources: RwLock<BTreeMap<String, DataSource>>,
}

impl MemorySourceRepository {
    pub fn new(sources: Vec<DataSource>) -> Self {
        let sources = sources.into_iter().map(|s| (s.id.clone(), s)).collect();
        Self {
            sources: RwLock::new(sources),
        }
    }

    pub fn insert(&self, source: DataSource) {
        let mut sources = self.sources.write().unwrap_or_else(|e| e.into_inner());
        sources.insert(source.id.clone(), source);
    }
}

#[async_trait]
impl DataSourceRepository for MemorySourceRepository {
    async fn list_source_ids(&self) -> Result<Vec<String>, SourceError> {
        let sources = self.sources.read().unwrap_or_else(|e| e.into_inner());
        Ok(sources.keys().cloned().collect())
    }

    async fn load_source(&self, id: &str) -> Result<DataSource, SourceError> {
        let sources = self.sources.read().unwrap_or_else(|e| e.into_inner());
        sources
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}
