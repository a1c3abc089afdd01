//! Crate-level error type.

use crate::services::api_client::ApiError;
use crate::services::token_store::TokenStoreError;
use crate::services::validation::ValidationError;

/// Everything a client operation can fail with
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Admin access required")]
    AdminRequired,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Payment callback listener error: {0}")]
    Callback(String),

    /// An API failure already turned into the text shown to the user
    #[error("{0}")]
    Failed(String),
}

impl ClientError {
    /// Text to show the user. Server messages win over generic ones.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(e) => e.user_message(),
            ClientError::Validation(e) => e.to_string(),
            ClientError::NotSignedIn => "Silakan masuk terlebih dahulu".to_string(),
            other => other.to_string(),
        }
    }

    /// Surface the server's message or fall back to `fallback` for API
    /// failures that carried none.
    pub fn user_message_or(&self, fallback: &str) -> String {
        match self {
            ClientError::Api(e) => e
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            other => other.user_message(),
        }
    }
}

impl ClientError {
    /// Collapse an API failure into [`ClientError::Failed`] carrying the
    /// server's message or `fallback`. Other errors pass through.
    pub fn or_fallback(self, fallback: &str) -> Self {
        match self {
            ClientError::Api(_) => ClientError::Failed(self.user_message_or(fallback)),
            other => other,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
