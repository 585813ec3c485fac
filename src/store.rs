use std::fs;
use std::path::{Path, PathBuf};

use crate::credential::StoredCredential;
use crate::error::AuthError;

/// Fixed relative path of the persisted credential file.
pub const DEFAULT_CONFIG_PATH: &str = "config/auth_config.json";

/// Storage abstraction for the persisted credential record.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<StoredCredential, AuthError>;
    fn save(&self, record: &StoredCredential) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// File-backed store holding one flat JSON object.
///
/// Single-process, single-writer: no locking and no atomic-rename write.
/// A missing or unreadable file loads as the empty record.
///
/// # Example
/// ```no_run
/// use allegro_auth::{FileTokenStore, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// let record = store.load()?;
/// # Ok::<(), allegro_auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn new_default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<StoredCredential, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredCredential::default())
            }
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(record),
            Err(err) => {
                // Unreadable records count as absent, same as a missing file.
                tracing::debug!(
                    path = %self.path.display(),
                    error = %err,
                    "ignoring malformed credential file"
                );
                Ok(StoredCredential::default())
            }
        }
    }

    fn save(&self, record: &StoredCredential) -> Result<(), AuthError> {
        Self::ensure_parent(&self.path)?;
        let serialized = serde_json::to_string(record)?;
        fs::write(&self.path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}
