use chrono::NaiveDate;

use crate::io::board_io::{BoardStore, StoreError};
use crate::model::board::Board;
use crate::model::column::ColumnId;
use crate::model::task::Task;
use crate::ops::store::TaskStore;

/// A `TaskStore` bound to a storage key, saved after every change.
///
/// Saves are skipped when the board is the same value as the last one
/// saved. A failed save is logged and kept for the caller to report; the
/// in-memory board is never rolled back.
pub struct PersistentBoard {
    store: TaskStore,
    backend: Box<dyn BoardStore>,
    key: String,
    /// Last board written, `None` until the first successful save
    saved: Option<Board>,
    save_error: Option<StoreError>,
}

impl PersistentBoard {
    /// Load `key` from the backend. With nothing stored the board starts as
    /// the sample board (or empty when `seed_sample` is off) and is written
    /// on the first `sync`.
    pub fn open(backend: Box<dyn BoardStore>, key: impl Into<String>, seed_sample: bool) -> Self {
        let key = key.into();
        let (board, saved) = Self::initial(backend.as_ref(), &key, seed_sample);
        PersistentBoard {
            store: TaskStore::new(board),
            backend,
            key,
            saved,
            save_error: None,
        }
    }

    fn initial(backend: &dyn BoardStore, key: &str, seed_sample: bool) -> (Board, Option<Board>) {
        match backend.load(key) {
            Some(board) => (board.clone(), Some(board)),
            None if seed_sample => {
                tracing::debug!(key, "no stored board, starting from sample");
                (Board::sample(), None)
            }
            None => (Board::new(), None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn board(&self) -> &Board {
        self.store.board()
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// True when the current board has not been written yet
    pub fn is_dirty(&self) -> bool {
        self.saved
            .as_ref()
            .is_none_or(|saved| !saved.same_as(self.store.board()))
    }

    /// Run an edit against the store, then save if it changed anything
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut TaskStore) -> R) -> R {
        let result = f(&mut self.store);
        self.sync();
        result
    }

    pub fn add(&mut self, text: &str, column: ColumnId, due_date: Option<NaiveDate>) -> Option<Task> {
        self.edit(|store| store.add(text, column, due_date))
    }

    pub fn toggle(&mut self, task_id: &str, column: ColumnId) {
        self.edit(|store| {
            store.toggle(task_id, column);
        });
    }

    pub fn delete(&mut self, task_id: &str, column: ColumnId) {
        self.edit(|store| {
            store.delete(task_id, column);
        });
    }

    pub fn move_task(&mut self, task_id: &str, from: ColumnId, to: ColumnId, before_id: Option<&str>) {
        self.edit(|store| {
            store.move_task(task_id, from, to, before_id);
        });
    }

    /// Save the current board if it differs from the last saved one.
    /// Returns true when a write happened.
    pub fn sync(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        let board = self.store.snapshot();
        match self.backend.save(&self.key, &board) {
            Ok(()) => {
                self.saved = Some(board);
                self.save_error = None;
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not save board");
                self.save_error = Some(e);
                false
            }
        }
    }

    /// The error from the most recent failed save, if it has not been
    /// followed by a successful one
    pub fn take_save_error(&mut self) -> Option<StoreError> {
        self.save_error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::board_io::{FileBoardStore, MemoryBoardStore};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Shares one in-memory map between the test and the board under test
    #[derive(Clone, Default)]
    struct SharedStore {
        inner: Rc<RefCell<MemoryBoardStore>>,
        saves: Rc<RefCell<usize>>,
    }

    impl BoardStore for SharedStore {
        fn load(&self, key: &str) -> Option<Board> {
            self.inner.borrow().load(key)
        }

        fn save(&mut self, key: &str, board: &Board) -> Result<(), StoreError> {
            *self.saves.borrow_mut() += 1;
            self.inner.borrow_mut().save(key, board)
        }
    }

    #[test]
    fn new_user_gets_sample_and_it_is_saved_on_sync() {
        let shared = SharedStore::default();
        let mut board = PersistentBoard::open(Box::new(shared.clone()), "todos_a", true);
        assert_eq!(board.board(), &Board::sample());
        assert!(board.is_dirty());
        assert!(board.sync());
        assert_eq!(shared.load("todos_a"), Some(Board::sample()));
        assert!(!board.sync());
    }

    #[test]
    fn seed_sample_off_starts_empty() {
        let board = PersistentBoard::open(Box::new(MemoryBoardStore::new()), "todos_a", false);
        assert!(board.board().is_empty());
    }

    #[test]
    fn every_change_is_saved() {
        let shared = SharedStore::default();
        let mut board = PersistentBoard::open(Box::new(shared.clone()), "todos_a", false);
        let task = board.add("Buy milk", ColumnId::Todo, None).unwrap();
        assert_eq!(shared.load("todos_a").unwrap().len(), 1);

        board.move_task(&task.id, ColumnId::Todo, ColumnId::Done, None);
        let stored = shared.load("todos_a").unwrap();
        // TODO is empty and still saved
        assert!(stored.column(ColumnId::Todo).is_empty());
        assert!(stored.column(ColumnId::Done)[0].completed);
        assert_eq!(*shared.saves.borrow(), 2);
    }

    #[test]
    fn noops_do_not_save() {
        let shared = SharedStore::default();
        let mut board = PersistentBoard::open(Box::new(shared.clone()), "todos_a", true);
        board.sync();
        let saves = *shared.saves.borrow();
        board.toggle("missing", ColumnId::Todo);
        board.delete("1", ColumnId::Done);
        assert!(board.add("   ", ColumnId::Todo, None).is_none());
        assert_eq!(*shared.saves.borrow(), saves);
    }

    #[test]
    fn stored_board_is_loaded_and_not_resaved() {
        let shared = SharedStore::default();
        shared.inner.borrow_mut().save("todos_a", &Board::new()).unwrap();
        let mut board = PersistentBoard::open(Box::new(shared.clone()), "todos_a", true);
        assert!(board.board().is_empty());
        assert!(!board.is_dirty());
        assert!(!board.sync());
    }

    #[test]
    fn failed_save_keeps_change_in_memory() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut board = PersistentBoard::open(Box::new(FileBoardStore::new(&blocker)), "todos_a", false);

        let task = board.add("Keep me", ColumnId::Todo, None).unwrap();
        assert!(board.board().contains_id(&task.id));
        assert!(board.is_dirty());
        assert!(matches!(board.take_save_error(), Some(StoreError::Write { .. })));
        assert!(board.take_save_error().is_none());
    }
}
