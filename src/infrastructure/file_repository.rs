// Directory-backed data source repository (one JSON document per source)
use crate::application::data_source_repository::{DataSourceRepository, SourceError};
use crate::domain::data_source::DataSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileSourceRepository {
    directory: PathBuf,
}

impl FileSourceRepository {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, id: &str) -> Option<PathBuf> {
        // Ids map straight to file names; reject anything that could escape the directory.
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return None;
        }
        Some(self.directory.join(format!("{}.json", id)))
    }
}

fn io_error(id: &str, source: std::io::Error) -> SourceError {
    SourceError::Io {
        id: id.to_string(),
        source,
    }
}

fn source_id(path: &Path) -> Option<String> {
    if path.extension()? != "json" {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}

#[async_trait]
impl DataSourceRepository for FileSourceRepository {
    async fn list_source_ids(&self) -> Result<Vec<String>, SourceError> {
        let dir = self.directory.display().to_string();
        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .map_err(|e| io_error(&dir, e))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, e))? {
            if let Some(id) = source_id(&entry.path()) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn load_source(&self, id: &str) -> Result<DataSource, SourceError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(id.to_string()));
            }
            Err(e) => return Err(io_error(id, e)),
        };

        let mut source: DataSource =
            serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode {
                id: id.to_string(),
                message: e.to_string(),
            })?;
        if source.id != id {
            tracing::debug!("Source file {} declares id {}; using file name", id, source.id);
            source.id = id.to_string();
        }

        tracing::debug!("Loaded source {} with {} rows", id, source.rows.len());
        Ok(source)
    }
}
