use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::config::ClientCredentials;
use crate::credential::{Credential, StoredCredential};
use crate::device_code::{AuthorizePrompt, DeviceCodeSession};
use crate::error::AuthError;
use crate::store::TokenStore;

const DEFAULT_DEVICE_CODE_URL: &str = "https://allegro.pl/auth/oauth/device";
const DEFAULT_TOKEN_URL: &str = "https://allegro.pl/auth/oauth/token";
const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Device-grant authorizer for the Allegro OAuth endpoints.
///
/// [`DeviceAuthorizer::authorize`] reuses a persisted grant when one is
/// usable, refreshes it when it has expired, and otherwise runs the full
/// device-code handshake, suspending on the injected [`AuthorizePrompt`]
/// until the operator confirms authorization out-of-band.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use allegro_auth::cli::commands::StdinPrompt;
/// use allegro_auth::{ClientCredentials, DeviceAuthorizer, FileTokenStore};
///
/// # async fn example() -> Result<(), allegro_auth::AuthError> {
/// let credentials = ClientCredentials::from_env()?;
/// let store = Arc::new(FileTokenStore::new_default());
/// let authorizer = DeviceAuthorizer::new(credentials, store, Arc::new(StdinPrompt));
/// let credential = authorizer.authorize().await?;
/// println!("{}", credential.access_token);
/// # Ok(())
/// # }
/// ```
pub struct DeviceAuthorizer {
    client: reqwest::Client,
    credentials: ClientCredentials,
    device_code_url: String,
    token_url: String,
    store: Arc<dyn TokenStore>,
    prompt: Arc<dyn AuthorizePrompt>,
    current: Mutex<Credential>,
}

impl DeviceAuthorizer {
    pub fn new(
        credentials: ClientCredentials,
        store: Arc<dyn TokenStore>,
        prompt: Arc<dyn AuthorizePrompt>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            device_code_url: DEFAULT_DEVICE_CODE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            store,
            prompt,
            current: Mutex::new(Credential::default()),
        }
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Snapshot of the in-memory credential.
    pub fn credential(&self) -> Credential {
        self.read_current()
    }

    /// Obtain a usable credential.
    ///
    /// Loads the persisted record; a complete grant is reused as-is when
    /// still fresh and refreshed when its recorded expiry has passed. An
    /// incomplete record triggers the full device-code handshake, whose
    /// result is persisted before returning.
    pub async fn authorize(&self) -> Result<Credential, AuthError> {
        let record = self.store.load()?;
        if record.has_complete_grant() {
            // Expiry is judged on the freshly loaded record, not on the
            // in-memory credential (still empty on the first call).
            let expired = record.expires_at().map_or(true, |at| at < Utc::now());
            let record = if expired {
                tracing::debug!("stored access token expired, refreshing");
                self.refresh_access_token().await?;
                self.store.load()?
            } else {
                record
            };
            let credential = record.to_credential();
            self.write_current(credential.clone());
            return Ok(credential);
        }

        let session = self.start_device_flow().await?;
        self.prompt.confirm(&session).await?;
        self.exchange_device_code(&session.device_code).await
    }

    /// POST the device-authorization request and surface the verification
    /// details the operator needs.
    pub async fn start_device_flow(&self) -> Result<DeviceCodeSession, AuthError> {
        let resp = self
            .client
            .post(&self.device_code_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("client_id", self.credentials.client_id.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "device code request failed with status {}",
                resp.status()
            )));
        }
        let payload: DeviceCodeResponse = resp.json().await?;
        let Some(device_code) = payload.device_code else {
            return Err(AuthError::InvalidResponse(
                "device code response missing device_code".to_string(),
            ));
        };
        tracing::debug!(user_code = %payload.user_code, "device flow started");
        Ok(DeviceCodeSession {
            device_code,
            user_code: payload.user_code,
            verification_uri: payload.verification_uri,
            verification_uri_complete: payload.verification_uri_complete,
            expires_in: payload.expires_in,
            interval: payload.interval,
        })
    }

    /// Exchange an authorized device code for an access token and persist
    /// the result.
    pub async fn exchange_device_code(&self, device_code: &str) -> Result<Credential, AuthError> {
        let resp = self
            .client
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[
                ("grant_type", DEVICE_CODE_GRANT),
                ("device_code", device_code),
            ])
            .send()
            .await?;
        let credential = self.read_token_response(resp).await?;
        self.store.save(&StoredCredential::from(&credential))?;
        self.write_current(credential.clone());
        tracing::debug!(expires_at = %credential.expires_at, "device code exchanged for access token");
        Ok(credential)
    }

    /// Exchange the stored refresh token for a new access token and persist
    /// the result.
    ///
    /// A record without a refresh token is a silent no-op returning the
    /// unmodified in-memory credential; no network call is made.
    pub async fn refresh_access_token(&self) -> Result<Credential, AuthError> {
        let record = self.store.load()?;
        let Some(refresh_token) = record.refresh_token else {
            return Ok(self.read_current());
        };
        let resp = self
            .client
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await?;
        let credential = self.read_token_response(resp).await?;
        self.store.save(&StoredCredential::from(&credential))?;
        self.write_current(credential.clone());
        tracing::debug!(expires_at = %credential.expires_at, "access token refreshed");
        Ok(credential)
    }

    /// Decode a token-endpoint response, mapping provider-reported errors
    /// before looking at the payload. The store is not touched here.
    async fn read_token_response(&self, resp: reqwest::Response) -> Result<Credential, AuthError> {
        let status = resp.status();
        let payload: TokenResponse = match resp.json().await {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(AuthError::InvalidResponse(format!(
                    "token request failed with status {status}"
                )))
            }
            Err(err) => return Err(err.into()),
        };
        if let Some(error) = payload.error {
            return Err(AuthError::ProviderRejected {
                error,
                description: payload.error_description,
            });
        }
        credential_from_response(payload, Utc::now())
    }

    fn read_current(&self) -> Credential {
        self.current
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn write_current(&self, credential: Credential) {
        if let Ok(mut guard) = self.current.lock() {
            *guard = credential;
        }
    }
}

fn credential_from_response(
    payload: TokenResponse,
    now: DateTime<Utc>,
) -> Result<Credential, AuthError> {
    let (Some(access_token), Some(expires_in)) = (payload.access_token, payload.expires_in) else {
        return Err(AuthError::InvalidResponse(
            "token response missing access_token or expires_in".to_string(),
        ));
    };
    Ok(Credential {
        access_token,
        token_type: payload.token_type.unwrap_or_default(),
        expires_at: now + Duration::seconds(expires_in),
        scope: payload.scope.unwrap_or_default(),
        refresh_token: payload.refresh_token.unwrap_or_default(),
    })
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: Option<String>,
    user_code: String,
    verification_uri: String,
    verification_uri_complete: Option<String>,
    expires_in: Option<u64>,
    interval: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_response() -> TokenResponse {
        TokenResponse {
            access_token: Some("access".to_string()),
            token_type: Some("Bearer".to_string()),
            expires_in: Some(3600),
            scope: Some("scope".to_string()),
            refresh_token: Some("refresh".to_string()),
            error: None,
            error_description: None,
        }
    }

    #[test]
    fn credential_derives_absolute_expiry() {
        let now = Utc::now();
        let credential = credential_from_response(full_response(), now).unwrap();
        assert_eq!(credential.access_token, "access");
        assert_eq!(credential.expires_at, now + Duration::seconds(3600));
    }

    #[test]
    fn missing_access_token_is_invalid_response() {
        let payload = TokenResponse {
            access_token: None,
            ..full_response()
        };
        let err = credential_from_response(payload, Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn missing_expires_in_is_invalid_response() {
        let payload = TokenResponse {
            expires_in: None,
            ..full_response()
        };
        let err = credential_from_response(payload, Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let payload = TokenResponse {
            token_type: None,
            scope: None,
            refresh_token: None,
            ..full_response()
        };
        let credential = credential_from_response(payload, Utc::now()).unwrap();
        assert_eq!(credential.token_type, "");
        assert_eq!(credential.scope, "");
        assert_eq!(credential.refresh_token, "");
    }
}
