use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::io::atomic::atomic_write;
use crate::model::board::Board;

/// Prefix of every per-user storage key
pub const KEY_PREFIX: &str = "todos_";

/// Storage key for a user's board
pub fn storage_key(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, name)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not serialize board: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Key-value persistence for boards.
///
/// `load` never fails: missing or unreadable data is `None`. `save` reports
/// failures so the caller can log them.
pub trait BoardStore {
    fn load(&self, key: &str) -> Option<Board>;
    fn save(&mut self, key: &str, board: &Board) -> Result<(), StoreError>;
}

/// Serialize a board to the stored blob format
pub fn encode_board(board: &Board) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(board)
}

/// Parse a stored blob. Malformed JSON is `None`. Tasks with blank text are
/// dropped, then duplicate ids (first occurrence wins), so a hand-edited
/// file cannot break the board invariants.
pub fn decode_board(key: &str, json: &str) -> Option<Board> {
    let board: Board = match serde_json::from_str(json) {
        Ok(board) => board,
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring malformed stored board");
            return None;
        }
    };
    let (board, removed) = board.drop_blank_text();
    if removed > 0 {
        tracing::warn!(key, removed, "dropped tasks with blank text");
    }
    let (board, removed) = board.dedupe_ids();
    if removed > 0 {
        tracing::warn!(key, removed, "dropped tasks with duplicate ids");
    }
    Some(board)
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// One JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileBoardStore {
    dir: PathBuf,
}

impl FileBoardStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBoardStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Bytes outside `[A-Za-z0-9_-]` are %-escaped so
    /// any user name maps to a single safe file name.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for b in key.bytes() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
                name.push(b as char);
            } else {
                name.push_str(&format!("%{:02X}", b));
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }

    /// Where an undecodable file for `key` is moved aside
    pub fn bad_path_for(&self, key: &str) -> PathBuf {
        self.path_for(key).with_extension("json.bad")
    }

    /// Move an undecodable file out of the way so the next save does not
    /// destroy it
    fn set_aside(&self, key: &str, path: &Path) {
        let bad = self.bad_path_for(key);
        match fs::rename(path, &bad) {
            Ok(()) => tracing::warn!(key, path = %bad.display(), "moved malformed board aside"),
            Err(e) => {
                tracing::warn!(key, path = %path.display(), error = %e, "could not move malformed board aside")
            }
        }
    }
}

impl BoardStore for FileBoardStore {
    fn load(&self, key: &str) -> Option<Board> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key, path = %path.display(), "no stored board");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, path = %path.display(), error = %e, "could not read stored board");
                return None;
            }
        };
        let Some(board) = decode_board(key, &content) else {
            self.set_aside(key, &path);
            return None;
        };
        tracing::debug!(key, tasks = board.len(), "loaded board");
        Some(board)
    }

    fn save(&mut self, key: &str, board: &Board) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let json = encode_board(board)?;
        atomic_write(&path, json.as_bytes()).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(key, tasks = board.len(), path = %path.display(), "saved board");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps serialized blobs in memory. Goes through the same encode/decode
/// path as the file store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBoardStore {
    blobs: HashMap<String, String>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw blob as-is
    pub fn insert_raw(&mut self, key: &str, json: impl Into<String>) {
        self.blobs.insert(key.to_string(), json.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }
}

impl BoardStore for MemoryBoardStore {
    fn load(&self, key: &str) -> Option<Board> {
        decode_board(key, self.blobs.get(key)?)
    }

    fn save(&mut self, key: &str, board: &Board) -> Result<(), StoreError> {
        let json = encode_board(board)?;
        self.blobs.insert(key.to_string(), json);
        Ok(())
    }
}
