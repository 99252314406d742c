use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three fixed board columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnId {
    Todo,
    InProgress,
    Done,
}

impl ColumnId {
    /// All columns in display order (left to right)
    pub const ALL: [ColumnId; 3] = [ColumnId::Todo, ColumnId::InProgress, ColumnId::Done];

    /// Position of this column in `ALL` (and in the board's column array)
    pub const fn index(self) -> usize {
        match self {
            ColumnId::Todo => 0,
            ColumnId::InProgress => 1,
            ColumnId::Done => 2,
        }
    }

    /// Column at a display position, if any
    pub fn from_index(idx: usize) -> Option<ColumnId> {
        Self::ALL.get(idx).copied()
    }

    /// Human-readable header ("To Do", "In Progress", "Done")
    pub fn title(self) -> &'static str {
        match self {
            ColumnId::Todo => "To Do",
            ColumnId::InProgress => "In Progress",
            ColumnId::Done => "Done",
        }
    }

    /// Stable symbolic name, matching the serialized key
    pub fn key(self) -> &'static str {
        match self {
            ColumnId::Todo => "TODO",
            ColumnId::InProgress => "IN_PROGRESS",
            ColumnId::Done => "DONE",
        }
    }

    /// The column to the left, if any
    pub fn prev(self) -> Option<ColumnId> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// The column to the right, if any
    pub fn next(self) -> Option<ColumnId> {
        Self::from_index(self.index() + 1)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Error returned when a column name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown column '{0}' (expected todo, in-progress, or done)")]
pub struct ParseColumnError(pub String);

impl FromStr for ColumnId {
    type Err = ParseColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "todo" | "to_do" => Ok(ColumnId::Todo),
            "in_progress" | "inprogress" | "doing" | "wip" => Ok(ColumnId::InProgress),
            "done" => Ok(ColumnId::Done),
            _ => Err(ParseColumnError(s.to_string())),
        }
    }
}
