//! allegro-auth — OAuth 2.0 Device Authorization Grant client for the
//! Allegro REST API.
//!
//! Obtains, persists, and refreshes an access token so that API calls can
//! attach a valid bearer credential. The device-code handshake suspends on
//! an injected [`AuthorizePrompt`] until the operator confirms the
//! out-of-band authorization.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use allegro_auth::cli::commands::StdinPrompt;
//! use allegro_auth::{ClientCredentials, DeviceAuthorizer, FileTokenStore};
//!
//! # async fn example() -> Result<(), allegro_auth::AuthError> {
//! let credentials = ClientCredentials::from_env()?;
//! let store = Arc::new(FileTokenStore::new_default());
//! let authorizer = DeviceAuthorizer::new(credentials, store, Arc::new(StdinPrompt));
//! let credential = authorizer.authorize().await?;
//! println!("{}", credential.access_token);
//! # Ok(())
//! # }
//! ```

pub mod authorizer;
pub mod cli;
pub mod client;
pub mod config;
pub mod credential;
pub mod device_code;
pub mod error;
pub mod store;

pub use authorizer::DeviceAuthorizer;
pub use client::ApiClient;
pub use config::ClientCredentials;
pub use credential::{Credential, StoredCredential};
pub use device_code::{AuthorizePrompt, DeviceCodeSession};
pub use error::AuthError;
pub use store::{FileTokenStore, TokenStore, DEFAULT_CONFIG_PATH};
