// HTTP error mapping
use crate::application::data_source_repository::SourceError;
use crate::application::template_service::InstantiateError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Instantiate(#[from] InstantiateError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Source(e) | ApiError::Instantiate(InstantiateError::Source(e)) => match e {
                SourceError::NotFound(_) => StatusCode::NOT_FOUND,
                SourceError::Http { .. } => StatusCode::BAD_GATEWAY,
                SourceError::Io { .. } | SourceError::Decode { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Instantiate(InstantiateError::Remap(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::RemapError;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(SourceError::NotFound("x".to_string()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let schema = ApiError::from(InstantiateError::Remap(RemapError::IncompatibleSchema {
            source_ref: "S1".to_string(),
            expected_tag: "a".to_string(),
            got_tag: "b".to_string(),
        }));
        assert_eq!(schema.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let upstream = ApiError::from(InstantiateError::Source(SourceError::Http {
            id: "x".to_string(),
            message: "timeout".to_string(),
        }));
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }
}
