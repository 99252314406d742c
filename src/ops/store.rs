use chrono::NaiveDate;

use crate::model::board::Board;
use crate::model::column::ColumnId;
use crate::model::task::Task;
use crate::ops::task_ops::{self, IdGenerator};

/// Owns the authoritative board for one session.
///
/// Every operation swaps in a new `Board` value; boards previously returned
/// by `board()`/`snapshot()` are never modified. Callers detect "nothing
/// changed" with `Board::same_as` against an earlier snapshot.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    board: Board,
    ids: IdGenerator,
}

impl TaskStore {
    pub fn new(board: Board) -> Self {
        TaskStore {
            board,
            ids: IdGenerator::new(),
        }
    }

    /// The current board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// A cheap owned copy of the current board
    pub fn snapshot(&self) -> Board {
        self.board.clone()
    }

    /// Add a task with a fresh id. Blank text is rejected with `None`.
    pub fn add(&mut self, text: &str, column: ColumnId, due_date: Option<NaiveDate>) -> Option<Task> {
        task_ops::normalize_text(text)?;
        let id = self.ids.next_id(&self.board);
        let (next, task) = task_ops::add_task(&self.board, id, text, column, due_date)?;
        self.board = next;
        Some(task)
    }

    pub fn toggle(&mut self, task_id: &str, column: ColumnId) -> &Board {
        self.board = task_ops::toggle_task(&self.board, task_id, column);
        &self.board
    }

    pub fn delete(&mut self, task_id: &str, column: ColumnId) -> &Board {
        self.board = task_ops::delete_task(&self.board, task_id, column);
        &self.board
    }

    pub fn move_task(
        &mut self,
        task_id: &str,
        from: ColumnId,
        to: ColumnId,
        before_id: Option<&str>,
    ) -> &Board {
        self.board = task_ops::move_task(&self.board, task_id, from, to, before_id);
        &self.board
    }
}
