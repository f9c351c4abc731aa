// Repository trait for data source access
use crate::domain::data_source::DataSource;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("data source '{0}' not found")]
    NotFound(String),
    #[error("failed to read data source '{id}': {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
    #[error("backend request for '{id}' failed: {message}")]
    Http { id: String, message: String },
    #[error("data source '{id}' is malformed: {message}")]
    Decode { id: String, message: String },
}

#[async_trait]
pub trait DataSourceRepository: Send + Sync {
    /// List the ids of every available data source
    async fn list_source_ids(&self) -> Result<Vec<String>, SourceError>;

    /// Fetch a fully materialized data source
    async fn load_source(&self, id: &str) -> Result<DataSource, SourceError>;

    /// Schema tag of a source, used for compatibility checks.
    ///
    /// The default loads the whole source; remote backends should override it.
    async fn schema_tag(&self, id: &str) -> Result<String, SourceError> {
        Ok(self.load_source(id).await?.schema_tag)
    }
}
