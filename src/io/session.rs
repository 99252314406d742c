use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::io::atomic::atomic_write;
use crate::io::board_io::storage_key;

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
}

impl Identity {
    /// Key under which this user's board is stored
    pub fn storage_key(&self) -> String {
        storage_key(&self.name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("could not write session file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk session record (session.json)
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    name: String,
    started: DateTime<Utc>,
}

/// Identity provider backed by a session file.
///
/// The file lives in a runtime directory when one exists, so the session
/// ends with the OS login session as well as on `logout`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a session. The name is trimmed; an empty name is rejected and
    /// leaves any existing session untouched.
    pub fn login(&self, name: &str) -> Result<Identity, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        let record = SessionRecord {
            name: name.to_string(),
            started: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        atomic_write(&self.path, json.as_bytes()).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(user = name, "logged in");
        Ok(Identity {
            name: record.name,
        })
    }

    /// End the session. Logging out when nobody is logged in is fine.
    pub fn logout(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("logged out");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// The current identity, or `None` when logged out or the session file
    /// is unreadable
    pub fn current(&self) -> Option<Identity> {
        let content = fs::read_to_string(&self.path).ok()?;
        let record: SessionRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed session file");
                return None;
            }
        };
        let name = record.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Identity {
            name: name.to_string(),
        })
    }
}
