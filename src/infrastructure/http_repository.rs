// Hosted backend data source repository
use crate::application::data_source_repository::{DataSourceRepository, SourceError};
use crate::domain::data_source::DataSource;
use crate::infrastructure::config::prepare_url;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpSourceRepository {
    client: reqwest::Client,
    base_url: String,
    token: String,
    url_template: String,
}

#[derive(Debug, Deserialize)]
struct SourceListResponse {
    #[serde(default)]
    sources: Vec<SourceSummary>,
}

#[derive(Debug, Deserialize)]
struct SourceSummary {
    id: String,
    #[serde(default)]
    schema_tag: Option<String>,
}

impl SourceListResponse {
    /// Tag advertised by the listing, `None` when the backend omits it.
    fn schema_tag(self, id: &str) -> Result<Option<String>, SourceError> {
        self.sources
            .into_iter()
            .find(|s| s.id == id)
            .map(|s| s.schema_tag)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

impl HttpSourceRepository {
    pub fn new(
        base_url: String,
        token: String,
        url_template: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            url_template,
        })
    }

    fn source_url(&self, id: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("base_url".to_string(), self.base_url.clone());
        vars.insert("id".to_string(), urlencoding::encode(id).into_owned());
        prepare_url(&self.url_template, &vars)
    }

    async fn get(&self, id: &str, url: &str) -> Result<reqwest::Response, SourceError> {
        let http_error = |message: String| SourceError::Http {
            id: id.to_string(),
            message,
        };

        let mut request = self.client.get(url).header("Accept", "application/json");
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await.map_err(|e| http_error(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(format!("status {}: {}", status, body)));
        }
        Ok(response)
    }

    async fn list(&self) -> Result<SourceListResponse, SourceError> {
        let url = format!("{}/sources", self.base_url);
        self.get("", &url)
            .await?
            .json::<SourceListResponse>()
            .await
            .map_err(|e| SourceError::Decode {
                id: String::new(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl DataSourceRepository for HttpSourceRepository {
    async fn list_source_ids(&self) -> Result<Vec<String>, SourceError> {
        let list = self.list().await?;
        Ok(list.sources.into_iter().map(|s| s.id).collect())
    }

    async fn schema_tag(&self, id: &str) -> Result<String, SourceError> {
        match self.list().await?.schema_tag(id)? {
            Some(tag) => Ok(tag),
            None => {
                tracing::debug!("Listing has no schema tag for {}, loading source", id);
                Ok(self.load_source(id).await?.schema_tag)
            }
        }
    }

    async fn load_source(&self, id: &str) -> Result<DataSource, SourceError> {
        let url = self.source_url(id);
        tracing::debug!("Fetching source {} from {}", id, url);

        let source = self
            .get(id, &url)
            .await?
            .json::<DataSource>()
            .await
            .map_err(|e| SourceError::Decode {
                id: id.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!("Fetched source {} with {} rows", id, source.rows.len());
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_encodes_id() {
        let repo = HttpSourceRepository::new(
            "https://backend.example.com/".to_string(),
            String::new(),
            "${base_url}/sources/${id}".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(
            repo.source_url("leads 2024/q1"),
            "https://backend.example.com/sources/leads%202024%2Fq1"
        );
    }

    #[test]
    fn test_schema_tag_from_listing() {
        let body = r#"{"sources": [
            {"id": "leads", "schema_tag": "crm-v2"},
            {"id": "vendas"}
        ]}"#;
        let list = || serde_json::from_str::<SourceListResponse>(body).unwrap();

        assert_eq!(list().schema_tag("leads").unwrap(), Some("crm-v2".to_string()));
        assert_eq!(list().schema_tag("vendas").unwrap(), None);
        assert!(matches!(
            list().schema_tag("estoque"),
            Err(SourceError::NotFound(id)) if id == "estoque"
        ));
    }
}
