//! CLI command handlers for login, status, and logout.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::authorizer::DeviceAuthorizer;
use crate::config::ClientCredentials;
use crate::credential::Credential;
use crate::device_code::{AuthorizePrompt, DeviceCodeSession};
use crate::error::AuthError;
use crate::store::{FileTokenStore, TokenStore};

/// Interactive prompt that prints the verification details and waits for
/// the operator to press Enter.
pub struct StdinPrompt;

#[async_trait]
impl AuthorizePrompt for StdinPrompt {
    async fn confirm(&self, session: &DeviceCodeSession) -> Result<(), AuthError> {
        println!(
            "🔗 Visit {} and enter the code: {}",
            session.verification_uri, session.user_code
        );
        if let Some(direct) = &session.verification_uri_complete {
            println!("   (or open {direct} directly)");
        }
        println!("Authorize the application in your browser, then press Enter to continue.");
        let mut line = String::new();
        let read = std::io::stdin().read_line(&mut line)?;
        if read == 0 {
            return Err(AuthError::Aborted(
                "stdin closed before confirmation".to_string(),
            ));
        }
        Ok(())
    }
}

fn store_at(config: Option<PathBuf>) -> FileTokenStore {
    match config {
        Some(path) => FileTokenStore::new(path),
        None => FileTokenStore::new_default(),
    }
}

/// Handle `allegro-auth login`.
pub async fn handle_login(config: Option<PathBuf>) -> Result<(), AuthError> {
    let credentials = ClientCredentials::from_env()?;
    let store = Arc::new(store_at(config));
    let authorizer = DeviceAuthorizer::new(credentials, store, Arc::new(StdinPrompt));
    match authorizer.authorize().await {
        Ok(credential) => {
            println!("✅ Authorized");
            print_credential(&credential);
            Ok(())
        }
        Err(err) if err.requires_reauthorization() => {
            eprintln!("The stored grant was rejected; run `allegro-auth logout` and log in again.");
            Err(err)
        }
        Err(err) => Err(err),
    }
}

/// Handle `allegro-auth status`.
pub async fn handle_status(config: Option<PathBuf>) -> Result<(), AuthError> {
    let store = store_at(config);
    let record = store.load()?;
    if !record.has_complete_grant() {
        println!("❌ Not logged in");
        return Ok(());
    }
    match record.expires_at() {
        Some(expires) if expires > Utc::now() => {
            println!("✅ Logged in (expires {})", expires.format("%Y-%m-%d %H:%M"));
        }
        _ => println!("⚠️  Token expired (will refresh on next login)"),
    }
    Ok(())
}

/// Handle `allegro-auth logout`.
pub async fn handle_logout(config: Option<PathBuf>) -> Result<(), AuthError> {
    let store = store_at(config);
    store.clear()?;
    println!("✅ Logged out");
    Ok(())
}

fn print_credential(credential: &Credential) {
    println!("access_token:  {}", credential.access_token);
    println!("token_type:    {}", credential.token_type);
    println!(
        "expires_at:    {}",
        credential.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("scope:         {}", credential.scope);
    println!("refresh_token: {}", credential.refresh_token);
}
