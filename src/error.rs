use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::catalog::CatalogError;
use crate::services::providers::EnrichmentError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Similarity index not initialized")]
    Uninitialized,

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::Uninitialized | AppError::Upstream(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<EnrichmentError> for AppError {
    fn from(err: EnrichmentError) -> Self {
        match err {
            EnrichmentError::Network(msg) => AppError::Network(msg),
            EnrichmentError::Upstream { .. } | EnrichmentError::Decode(_) => {
                AppError::Upstream(err.to_string())
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(title) => {
                AppError::NotFound(format!("Title not found in local dataset: '{}'", title))
            }
            CatalogError::Uninitialized => AppError::Uninitialized,
            other => AppError::Internal(other.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (AppError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Uninitialized, StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Upstream("500".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Network("refused".into()), StatusCode::BAD_GATEWAY),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_enrichment_error_classification() {
        let network: AppError = EnrichmentError::Network("timed out".into()).into();
        assert!(matches!(network, AppError::Network(_)));

        let upstream: AppError = EnrichmentError::Upstream {
            status: 401,
            body: "invalid api key".into(),
        }
        .into();
        assert!(matches!(upstream, AppError::Upstream(_)));

        let decode: AppError = EnrichmentError::Decode("missing field".into()).into();
        assert!(matches!(decode, AppError::Upstream(_)));
    }

    #[test]
    fn test_catalog_error_conversion() {
        let missing: AppError = CatalogError::NotFound("Nope".into()).into();
        assert!(matches!(missing, AppError::NotFound(ref msg) if msg.contains("Nope")));

        let uninit: AppError = CatalogError::Uninitialized.into();
        assert!(matches!(uninit, AppError::Uninitialized));
    }
}
