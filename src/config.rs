use crate::error::AuthError;

const CLIENT_ID_VAR: &str = "ALLEGRO_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "ALLEGRO_CLIENT_SECRET";

/// Application credentials issued by the Allegro developer portal.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read credentials from `ALLEGRO_CLIENT_ID` / `ALLEGRO_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self, AuthError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let client_id = std::env::var(CLIENT_ID_VAR)
            .map_err(|_| AuthError::Configuration(format!("{CLIENT_ID_VAR} not set")))?;
        let client_secret = std::env::var(CLIENT_SECRET_VAR)
            .map_err(|_| AuthError::Configuration(format!("{CLIENT_SECRET_VAR} not set")))?;
        Ok(Self {
            client_id,
            client_secret,
        })
    }
}
