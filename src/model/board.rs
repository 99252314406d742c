use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::column::ColumnId;
use super::task::Task;

/// The full task state: one ordered task sequence per column.
///
/// Columns are shared behind `Arc`, so cloning a board is cheap and a
/// transformation only copies the column it touches. A board value is never
/// mutated after it has been handed out; every change produces a new `Board`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    columns: [Arc<Vec<Task>>; 3],
}

impl Board {
    /// An empty board
    pub fn new() -> Self {
        Board::default()
    }

    /// Build a board from per-column task lists
    pub fn from_columns(todo: Vec<Task>, in_progress: Vec<Task>, done: Vec<Task>) -> Self {
        Board {
            columns: [Arc::new(todo), Arc::new(in_progress), Arc::new(done)],
        }
    }

    /// The board a new user starts with
    pub fn sample() -> Self {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
        Board::from_columns(
            vec![
                Task::new("1", "Add a dark mode toggle", true).with_due_date(date("2023-10-01")),
                Task::new("2", "Implement user login", false).with_due_date(date("2024-08-15")),
            ],
            vec![Task::new("3", "Scope tasks to logged-in user", false)],
            vec![
                Task::new("4", "Setup project with drag-and-drop", true)
                    .with_due_date(date("2023-09-20")),
            ],
        )
    }

    /// Tasks of one column, in display order
    pub fn column(&self, col: ColumnId) -> &[Task] {
        &self.columns[col.index()]
    }

    /// Iterate `(column, tasks)` pairs in display order
    pub fn columns(&self) -> impl Iterator<Item = (ColumnId, &[Task])> {
        ColumnId::ALL
            .into_iter()
            .map(move |col| (col, self.column(col)))
    }

    /// Iterate every task on the board with its column
    pub fn tasks(&self) -> impl Iterator<Item = (ColumnId, &Task)> {
        self.columns()
            .flat_map(|(col, tasks)| tasks.iter().map(move |t| (col, t)))
    }

    /// Total number of tasks
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|c| c.is_empty())
    }

    /// Find a task anywhere on the board
    pub fn find(&self, task_id: &str) -> Option<(ColumnId, &Task)> {
        self.tasks().find(|(_, t)| t.id == task_id)
    }

    /// Which column holds the task, if any
    pub fn locate(&self, task_id: &str) -> Option<ColumnId> {
        self.find(task_id).map(|(col, _)| col)
    }

    pub fn contains_id(&self, task_id: &str) -> bool {
        self.find(task_id).is_some()
    }

    /// Position of a task within one column
    pub fn position_in(&self, col: ColumnId, task_id: &str) -> Option<usize> {
        self.column(col).iter().position(|t| t.id == task_id)
    }

    /// True when both boards share every column allocation, i.e. one was
    /// derived from the other without any change. Constant time.
    pub fn same_as(&self, other: &Board) -> bool {
        self.columns
            .iter()
            .zip(other.columns.iter())
            .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    /// True when both boards share the allocation of one column
    pub fn shares_column(&self, other: &Board, col: ColumnId) -> bool {
        Arc::ptr_eq(&self.columns[col.index()], &other.columns[col.index()])
    }

    /// Derive a new board with one column edited. Other columns stay shared.
    pub(crate) fn with_column(&self, col: ColumnId, edit: impl FnOnce(&mut Vec<Task>)) -> Board {
        let mut next = self.clone();
        edit(Arc::make_mut(&mut next.columns[col.index()]));
        next
    }

    /// Derive a new board with one column replaced wholesale
    pub(crate) fn with_column_replaced(&self, col: ColumnId, tasks: Vec<Task>) -> Board {
        let mut next = self.clone();
        next.columns[col.index()] = Arc::new(tasks);
        next
    }

    /// Drop every task whose id was already seen earlier on the board
    /// (scanning columns left to right). Returns the cleaned board and the
    /// number of tasks removed; the same board is returned when clean.
    pub fn dedupe_ids(&self) -> (Board, usize) {
        let mut seen = HashSet::new();
        self.retain_tasks(|t| seen.insert(t.id.clone()))
    }

    /// Drop tasks whose text is empty after trimming
    pub fn drop_blank_text(&self) -> (Board, usize) {
        self.retain_tasks(|t| !t.text.trim().is_empty())
    }

    /// Keep the tasks `keep` admits, visiting columns left to right. Only
    /// columns that lost a task are reallocated.
    fn retain_tasks(&self, mut keep: impl FnMut(&Task) -> bool) -> (Board, usize) {
        let mut removed = 0;
        let mut next = self.clone();
        for col in ColumnId::ALL {
            let tasks = self.column(col);
            let kept: Vec<Task> = tasks.iter().filter(|t| keep(t)).cloned().collect();
            if kept.len() != tasks.len() {
                removed += tasks.len() - kept.len();
                next = next.with_column_replaced(col, kept);
            }
        }
        (next, removed)
    }
}

// ---------------------------------------------------------------------------
// Stored blob format: {"TODO": [...], "IN_PROGRESS": [...], "DONE": [...]}
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct BoardRef<'a> {
    #[serde(rename = "TODO")]
    todo: &'a [Task],
    #[serde(rename = "IN_PROGRESS")]
    in_progress: &'a [Task],
    #[serde(rename = "DONE")]
    done: &'a [Task],
}

#[derive(Deserialize)]
struct BoardRepr {
    #[serde(rename = "TODO", default)]
    todo: Vec<Task>,
    #[serde(rename = "IN_PROGRESS", default)]
    in_progress: Vec<Task>,
    #[serde(rename = "DONE", default)]
    done: Vec<Task>,
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BoardRef {
            todo: self.column(ColumnId::Todo),
            in_progress: self.column(ColumnId::InProgress),
            done: self.column(ColumnId::Done),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = BoardRepr::deserialize(deserializer)?;
        Ok(Board::from_columns(repr.todo, repr.in_progress, repr.done))
    }
}
