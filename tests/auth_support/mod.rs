#![allow(dead_code)]

use std::sync::Mutex;

use allegro_auth::{AuthError, AuthorizePrompt, DeviceCodeSession, StoredCredential, TokenStore};
use async_trait::async_trait;
use chrono::{Duration, Utc};

/// Store double keeping the record in memory.
#[derive(Default)]
pub struct InMemoryTokenStore {
    record: Mutex<Option<StoredCredential>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, record: StoredCredential) {
        *self.record.lock().expect("store lock poisoned") = Some(record);
    }

    pub fn get(&self) -> Option<StoredCredential> {
        self.record.lock().expect("store lock poisoned").clone()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<StoredCredential, AuthError> {
        Ok(self.get().unwrap_or_default())
    }

    fn save(&self, record: &StoredCredential) -> Result<(), AuthError> {
        self.seed(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.record.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

/// Prompt double that confirms immediately and counts invocations.
#[derive(Default)]
pub struct AutoConfirmPrompt {
    confirmations: Mutex<u32>,
}

impl AutoConfirmPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirmations(&self) -> u32 {
        *self.confirmations.lock().expect("prompt lock poisoned")
    }
}

#[async_trait]
impl AuthorizePrompt for AutoConfirmPrompt {
    async fn confirm(&self, _session: &DeviceCodeSession) -> Result<(), AuthError> {
        *self.confirmations.lock().expect("prompt lock poisoned") += 1;
        Ok(())
    }
}

pub fn fresh_record(access_token: &str) -> StoredCredential {
    StoredCredential {
        access_token: Some(access_token.to_string()),
        token_type: Some("Bearer".to_string()),
        expires_in: Some((Utc::now() + Duration::hours(1)).timestamp()),
        scope: Some("allegro:api:sale:offers:read".to_string()),
        refresh_token: Some("refresh-1".to_string()),
    }
}

pub fn expired_record(access_token: &str) -> StoredCredential {
    StoredCredential {
        expires_in: Some((Utc::now() - Duration::hours(1)).timestamp()),
        ..fresh_record(access_token)
    }
}
