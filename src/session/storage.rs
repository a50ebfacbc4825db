//! Durable storage for the access token and user id

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::Result;

/// The two values that survive a restart. They are written and cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    pub access_token: String,
    pub user_id: i64,
}

impl StoredCredentials {
    pub fn new(user_id: i64, access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id,
        }
    }
}

/// Key-value persistence for the session's credentials
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredCredentials>>;

    fn save(&self, credentials: &StoredCredentials) -> Result<()>;

    /// Remove both entries. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;

    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.load()?.map(|c| c.access_token))
    }
}

/// Credentials kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        // `mode` only applies on creation; an existing file keeps its bits
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(serde_json::to_string_pretty(credentials)?.as_bytes())?;
        file.sync_all()?;
        tracing::debug!(path = %self.path.display(), "saved credentials");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed credentials");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Credentials that live only as long as the process
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            inner: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredentials>> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
