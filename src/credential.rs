use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer credential held in memory by the authorizer.
///
/// A credential is either fully empty (the default, meaning
/// "unauthenticated") or fully populated from one successful token
/// exchange. Partial population is not a supported state.
///
/// # Example
/// ```
/// use allegro_auth::Credential;
///
/// let credential = Credential::default();
/// assert!(credential.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub scope: String,
    pub refresh_token: String,
}

impl Default for Credential {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            token_type: String::new(),
            expires_at: DateTime::<Utc>::UNIX_EPOCH,
            scope: String::new(),
            refresh_token: String::new(),
        }
    }
}

impl Credential {
    /// True until a token exchange has populated the record.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }

    /// Whether the access token must be treated as invalid at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// On-disk mirror of a [`Credential`], one flat JSON object.
///
/// As persisted, `expires_in` holds an absolute Unix timestamp in seconds
/// (computed at write time as now + the provider's relative expiry), not
/// the wire-format relative value of the same name. The key names are the
/// credential file contract; renaming them would orphan existing files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl StoredCredential {
    /// Presence check for the keys a usable grant needs.
    ///
    /// Presence only: whether the token is still fresh is judged separately
    /// against [`StoredCredential::expires_at`].
    pub fn has_complete_grant(&self) -> bool {
        self.access_token.is_some() && self.expires_in.is_some() && self.refresh_token.is_some()
    }

    /// Absolute expiry instant, if recorded.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_in
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    /// Materialize the in-memory credential. Missing optional fields fall
    /// back to empty strings; a missing expiry maps to the epoch.
    pub fn to_credential(&self) -> Credential {
        Credential {
            access_token: self.access_token.clone().unwrap_or_default(),
            token_type: self.token_type.clone().unwrap_or_default(),
            expires_at: self
                .expires_at()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            scope: self.scope.clone().unwrap_or_default(),
            refresh_token: self.refresh_token.clone().unwrap_or_default(),
        }
    }
}

impl From<&Credential> for StoredCredential {
    fn from(credential: &Credential) -> Self {
        Self {
            access_token: Some(credential.access_token.clone()),
            token_type: Some(credential.token_type.clone()),
            expires_in: Some(credential.expires_at.timestamp()),
            scope: Some(credential.scope.clone()),
            refresh_token: Some(credential.refresh_token.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn complete_record() -> StoredCredential {
        StoredCredential {
            access_token: Some("access".to_string()),
            token_type: Some("Bearer".to_string()),
            expires_in: Some(1_700_000_000),
            scope: Some("allegro:api:sale:offers:read".to_string()),
            refresh_token: Some("refresh".to_string()),
        }
    }

    #[test]
    fn default_credential_is_empty() {
        let credential = Credential::default();
        assert!(credential.is_empty());
        assert!(credential.is_expired_at(Utc::now()));
    }

    #[test]
    fn complete_grant_requires_all_three_keys() {
        assert!(complete_record().has_complete_grant());

        let mut missing_access = complete_record();
        missing_access.access_token = None;
        assert!(!missing_access.has_complete_grant());

        let mut missing_expiry = complete_record();
        missing_expiry.expires_in = None;
        assert!(!missing_expiry.has_complete_grant());

        let mut missing_refresh = complete_record();
        missing_refresh.refresh_token = None;
        assert!(!missing_refresh.has_complete_grant());
    }

    #[test]
    fn complete_grant_ignores_token_type_and_scope() {
        let record = StoredCredential {
            token_type: None,
            scope: None,
            ..complete_record()
        };
        assert!(record.has_complete_grant());
    }

    #[test]
    fn credential_round_trips_through_stored_form() {
        let credential = Credential {
            access_token: "access".to_string(),
            token_type: "Bearer".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            scope: "scope".to_string(),
            refresh_token: "refresh".to_string(),
        };
        let stored = StoredCredential::from(&credential);
        let restored = stored.to_credential();
        assert_eq!(restored.access_token, credential.access_token);
        assert_eq!(restored.refresh_token, credential.refresh_token);
        // Sub-second precision is dropped by the epoch-seconds contract.
        assert_eq!(
            restored.expires_at.timestamp(),
            credential.expires_at.timestamp()
        );
    }

    #[test]
    fn missing_fields_materialize_as_defaults() {
        let credential = StoredCredential::default().to_credential();
        assert!(credential.is_empty());
        assert_eq!(credential.expires_at, DateTime::<Utc>::UNIX_EPOCH);
    }
}
