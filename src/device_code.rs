use async_trait::async_trait;

use crate::error::AuthError;

/// Verification details returned by the device-authorization endpoint.
#[derive(Debug, Clone)]
pub struct DeviceCodeSession {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub expires_in: Option<u64>,
    pub interval: Option<u64>,
}

/// Suspension point between obtaining a device code and exchanging it.
///
/// Implementations surface the verification URI and user code to the
/// operator and return once the out-of-band authorization has been
/// confirmed. The wait is unbounded; timeouts and cancellation are an
/// implementation concern.
#[async_trait]
pub trait AuthorizePrompt: Send + Sync {
    async fn confirm(&self, session: &DeviceCodeSession) -> Result<(), AuthError>;
}
