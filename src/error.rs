use thiserror::Error;

/// Normalized errors across the authorization flows and token storage.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Provider rejected the request: {error}")]
    ProviderRejected {
        error: String,
        description: Option<String>,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Authorization aborted: {0}")]
    Aborted(String),
}

impl AuthError {
    /// True when the stored grant is no longer usable and the operator must
    /// run the device flow again.
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            Self::ProviderRejected { error, .. }
                if error == "invalid_grant" || error == "expired_token" || error == "access_denied"
        )
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
