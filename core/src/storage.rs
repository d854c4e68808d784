//! Durable session storage.
//!
//! # Design
//! The token and user record share one lifecycle — written together on
//! login, removed together on logout — so `FileStore` keeps them in a
//! single JSON document rather than two separate entries, which makes the
//! pairing atomic by construction. `MemoryStore` backs tests and hosts
//! without a filesystem.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ApiError;
use crate::types::Session;

/// Where a session survives process restarts.
pub trait SessionStore {
    /// Load the persisted session, if any. A missing entry is `Ok(None)`,
    /// not an error.
    fn load(&self) -> Result<Option<Session>, ApiError>;

    /// Persist the session, replacing any previous one.
    fn save(&self, session: &Session) -> Result<(), ApiError>;

    /// Remove the persisted session. Removing an absent session succeeds.
    fn clear(&self) -> Result<(), ApiError>;
}

/// File-backed store: one JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("blog-client").join("session.json"))
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<Session>, ApiError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            fs::read_to_string(&self.path).map_err(|e| ApiError::Storage(e.to_string()))?;
        let session =
            serde_json::from_str(&contents).map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ApiError::Storage(e.to_string()))?;
        }
        let contents =
            serde_json::to_string(session).map_err(|e| ApiError::Storage(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| ApiError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }
}

/// In-process store for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    session: RefCell<Option<Session>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.session.borrow().clone())
    }

    fn save(&self, session: &Session) -> Result<(), ApiError> {
        *self.session.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.session.borrow_mut() = None;
        Ok(())
    }
}
