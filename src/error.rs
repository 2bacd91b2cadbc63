//! Error taxonomy for the locale layer.
//!
//! The router never produces these; they come from configuration, translation
//! sources, and lookups of unknown locales or resources.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required configuration is missing or invalid. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A translation source could not supply a table.
    #[error("failed to load translations for {locale}/{namespace}: {reason}")]
    Load {
        locale: String,
        namespace: String,
        reason: String,
    },

    /// Unknown locale or resource.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid namespace: '{0}'")]
    InvalidNamespace(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn load(locale: &str, namespace: &str, reason: impl std::fmt::Display) -> Self {
        Error::Load {
            locale: locale.to_string(),
            namespace: namespace.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) | Error::InvalidNamespace(_) => StatusCode::NOT_FOUND,
            Error::Configuration(_) | Error::Load { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // Keep source details in the logs only
            error!("Request failed: {}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
