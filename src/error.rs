use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::config::AUTH_REALM;
use crate::db::StoreError;

/// Body returned for every unexpected failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Error {context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a store failure with what the handler was doing.
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        AppError::Store {
            context: context.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Store { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Extension for turning store results into handler errors.
pub trait ResultExt<T> {
    fn context(self, context: &str) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, StoreError> {
    fn context(self, context: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::store(context, e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Store { .. } | AppError::Internal(_) => {
                // Details stay in the log; callers only see the generic message.
                tracing::error!(error = %self, "Request failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            _ => self.to_string(),
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(challenge) = HeaderValue::from_str(&format!("Basic realm=\"{}\"", AUTH_REALM)) {
                response.headers_mut().insert(WWW_AUTHENTICATE, challenge);
            }
        }
        response
    }
}
