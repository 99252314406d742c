use crate::model::column::ColumnId;
use crate::model::task::Task;
use crate::ops::store::TaskStore;

/// Gesture state for an in-progress drag.
///
/// Tracks which task was picked up and where it is hovering; nothing touches
/// the board until `drop_on` resolves the gesture into a single
/// `TaskStore::move_task`. Input layers (mouse, keyboard) drive it through
/// the same four transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Idle,
    Dragging {
        /// The task as it looked when picked up
        task: Task,
        source: ColumnId,
        /// Column currently under the pointer/cursor
        hover: Option<ColumnId>,
    },
}

/// What a drop did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active
    Ignored,
    /// A move was issued. `changed` is false when the move resolved to a
    /// no-op (e.g. the task vanished mid-drag).
    Moved {
        task_id: String,
        from: ColumnId,
        to: ColumnId,
        changed: bool,
    },
}

impl DragSession {
    pub fn new() -> Self {
        DragSession::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragSession::Dragging { .. })
    }

    /// The dragged task and its source column
    pub fn dragged(&self) -> Option<(&Task, ColumnId)> {
        match self {
            DragSession::Dragging { task, source, .. } => Some((task, *source)),
            DragSession::Idle => None,
        }
    }

    pub fn hover_column(&self) -> Option<ColumnId> {
        match self {
            DragSession::Dragging { hover, .. } => *hover,
            DragSession::Idle => None,
        }
    }

    /// Pick up a task. Starting a new drag abandons any drag in progress.
    pub fn begin_drag(&mut self, task: Task, source: ColumnId) {
        *self = DragSession::Dragging {
            task,
            source,
            hover: None,
        };
    }

    /// Update the hovered column. Ignored when idle.
    pub fn hover(&mut self, column: ColumnId) {
        if let DragSession::Dragging { hover, .. } = self {
            *hover = Some(column);
        }
    }

    /// Release over `dest`, before `target` (or at the end when `None`).
    /// Always returns to `Idle`.
    pub fn drop_on(
        &mut self,
        store: &mut TaskStore,
        target: Option<&Task>,
        dest: ColumnId,
    ) -> DropOutcome {
        let DragSession::Dragging { task, source, .. } = std::mem::take(self) else {
            return DropOutcome::Ignored;
        };
        let before = store.snapshot();
        store.move_task(&task.id, source, dest, target.map(|t| t.id.as_str()));
        DropOutcome::Moved {
            changed: !store.board().same_as(&before),
            task_id: task.id,
            from: source,
            to: dest,
        }
    }

    /// Abandon the drag without touching the board
    pub fn cancel(&mut self) {
        *self = DragSession::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::Board;

    fn store() -> TaskStore {
        TaskStore::new(Board::sample())
    }

    fn task(store: &TaskStore, id: &str) -> Task {
        store.board().find(id).map(|(_, t)| t.clone()).unwrap()
    }

    #[test]
    fn begin_hover_drop_moves_task() {
        let mut store = store();
        let mut drag = DragSession::new();
        drag.begin_drag(task(&store, "2"), ColumnId::Todo);
        assert!(drag.is_dragging());
        assert_eq!(drag.hover_column(), None);

        drag.hover(ColumnId::InProgress);
        assert_eq!(drag.hover_column(), Some(ColumnId::InProgress));
        // Hovering does not touch the board
        assert_eq!(store.board().locate("2"), Some(ColumnId::Todo));

        let target = task(&store, "3");
        let outcome = drag.drop_on(&mut store, Some(&target), ColumnId::InProgress);
        assert_eq!(
            outcome,
            DropOutcome::Moved {
                task_id: "2".into(),
                from: ColumnId::Todo,
                to: ColumnId::InProgress,
                changed: true,
            }
        );
        assert_eq!(drag, DragSession::Idle);
        let order: Vec<&str> = store
            .board()
            .column(ColumnId::InProgress)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(order, vec!["2", "3"]);
    }

    #[test]
    fn drop_on_empty_column_appends() {
        let mut store = TaskStore::new(Board::from_columns(
            vec![Task::new("a", "A", false)],
            vec![],
            vec![],
        ));
        let mut drag = DragSession::new();
        drag.begin_drag(task(&store, "a"), ColumnId::Todo);
        drag.drop_on(&mut store, None, ColumnId::Done);
        let done = store.board().column(ColumnId::Done);
        assert_eq!(done.len(), 1);
        assert!(done[0].completed);
    }

    #[test]
    fn drop_while_idle_is_ignored() {
        let mut store = store();
        let before = store.snapshot();
        let mut drag = DragSession::new();
        let target = task(&store, "1");
        let outcome = drag.drop_on(&mut store, Some(&target), ColumnId::Done);
        assert_eq!(outcome, DropOutcome::Ignored);
        assert!(store.board().same_as(&before));
    }

    #[test]
    fn hover_while_idle_is_ignored() {
        let mut drag = DragSession::new();
        drag.hover(ColumnId::Done);
        assert_eq!(drag, DragSession::Idle);
    }

    #[test]
    fn cancel_leaves_board_alone() {
        let mut store = store();
        let before = store.snapshot();
        let mut drag = DragSession::new();
        drag.begin_drag(task(&store, "1"), ColumnId::Todo);
        drag.hover(ColumnId::Done);
        drag.cancel();
        assert!(!drag.is_dragging());
        assert_eq!(drag.drop_on(&mut store, None, ColumnId::Done), DropOutcome::Ignored);
        assert!(store.board().same_as(&before));
    }

    #[test]
    fn drop_after_task_deleted_mid_drag_is_noop() {
        let mut store = store();
        let mut drag = DragSession::new();
        drag.begin_drag(task(&store, "1"), ColumnId::Todo);
        store.delete("1", ColumnId::Todo);
        let before = store.snapshot();

        let outcome = drag.drop_on(&mut store, None, ColumnId::Done);
        assert!(matches!(outcome, DropOutcome::Moved { changed: false, .. }));
        assert!(store.board().same_as(&before));
        assert!(!store.board().contains_id("1"));
    }

    #[test]
    fn begin_drag_replaces_previous_drag() {
        let store = store();
        let mut drag = DragSession::new();
        drag.begin_drag(task(&store, "1"), ColumnId::Todo);
        drag.hover(ColumnId::Done);
        drag.begin_drag(task(&store, "3"), ColumnId::InProgress);
        let (dragged, source) = drag.dragged().unwrap();
        assert_eq!(dragged.id, "3");
        assert_eq!(source, ColumnId::InProgress);
        assert_eq!(drag.hover_column(), None);
    }
}
