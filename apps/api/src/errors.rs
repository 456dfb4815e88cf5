use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Client input problems and failed SQL are 400s; failed SQL additionally
/// carries the database's own message so editor users can fix their
/// statement. Provider and internal failures are 500s. Best-effort paths
/// (schema summary, history retrieval, audit logging) never surface here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Query error: {message}")]
    Query { message: String, details: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a failure from the pass-through query endpoint, keeping the
    /// database's own message as the caller-visible error text.
    pub fn from_query_error(e: sqlx::Error) -> Self {
        let message = match &e {
            sqlx::Error::Database(db) => db.message().to_string(),
            other => other.to_string(),
        };
        AppError::Query {
            message,
            details: format!("{e:?}"),
        }
    }

    /// Caller-visible message for this error, as rendered into the body.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Query { message, .. } => message.clone(),
            AppError::Provider(msg) => msg.clone(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<crate::openai_client::OpenAiError> for AppError {
    fn from(e: crate::openai_client::OpenAiError) -> Self {
        AppError::Provider(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::Query { .. } => StatusCode::BAD_REQUEST,
            AppError::Provider(msg) => {
                tracing::error!("Provider error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            AppError::Query { message, details } => Json(json!({
                "error": message,
                "details": details,
            })),
            other => Json(json!({ "error": other.public_message() })),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_400() {
        let response = AppError::Validation("SQL required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_query_error_is_400_with_message() {
        let err = AppError::Query {
            message: "relation \"nope\" does not exist".to_string(),
            details: "Database(PgDatabaseError { .. })".to_string(),
        };
        assert_eq!(err.public_message(), "relation \"nope\" does not exist");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_provider_error_is_500() {
        let response = AppError::Provider("API error (status 429)".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_hides_details() {
        let err = AppError::Internal(anyhow::anyhow!("pool exhausted"));
        assert_eq!(err.public_message(), "An internal server error occurred");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_query_error_keeps_sqlx_message() {
        let err = AppError::from_query_error(sqlx::Error::RowNotFound);
        match err {
            AppError::Query { message, .. } => {
                assert!(!message.is_empty());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
