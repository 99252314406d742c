use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, TimeDelta, Utc};

use crate::model::board::Board;
use crate::model::column::ColumnId;
use crate::model::task::Task;

// Every transform here is total: a stale id or column yields the input board
// back unchanged (`Board::same_as` holds), never an error.

// ---------------------------------------------------------------------------
// Create / update / delete
// ---------------------------------------------------------------------------

/// Trim task text, rejecting text that is empty after trimming
pub fn normalize_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Append a new task to the end of `column`.
///
/// Returns `None` (and no new board) when the text is blank or `id` is
/// already on the board. Tasks filed into DONE start completed.
pub fn add_task(
    board: &Board,
    id: String,
    text: &str,
    column: ColumnId,
    due_date: Option<NaiveDate>,
) -> Option<(Board, Task)> {
    let text = normalize_text(text)?;
    if board.contains_id(&id) {
        return None;
    }
    let task = Task::new(id, text, column == ColumnId::Done).with_due_date(due_date);
    let next = board.with_column(column, |tasks| tasks.push(task.clone()));
    Some((next, task))
}

/// Flip the completion flag of a task in `column`
pub fn toggle_task(board: &Board, task_id: &str, column: ColumnId) -> Board {
    let Some(idx) = board.position_in(column, task_id) else {
        return board.clone();
    };
    board.with_column(column, |tasks| {
        let task = &mut tasks[idx];
        task.completed = !task.completed;
    })
}

/// Permanently remove a task from `column`
pub fn delete_task(board: &Board, task_id: &str, column: ColumnId) -> Board {
    let Some(idx) = board.position_in(column, task_id) else {
        return board.clone();
    };
    board.with_column(column, |tasks| {
        tasks.remove(idx);
    })
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// Move a task from `from` to `to`, inserting it immediately before
/// `before_id` in the destination (or at the end when `before_id` is absent
/// or not in the destination). Same-column moves reorder. Dropping a task
/// before itself keeps its position.
///
/// Entering DONE forces `completed = true`; leaving DONE keeps the flag.
pub fn move_task(
    board: &Board,
    task_id: &str,
    from: ColumnId,
    to: ColumnId,
    before_id: Option<&str>,
) -> Board {
    let Some(src_idx) = board.position_in(from, task_id) else {
        return board.clone();
    };

    if from == to {
        return board.with_column(from, |tasks| {
            let mut task = tasks.remove(src_idx);
            file_into(&mut task, to);
            let dest_idx = if before_id == Some(task_id) {
                src_idx
            } else {
                insert_index(tasks, before_id)
            };
            tasks.insert(dest_idx, task);
        });
    }

    let mut task = board.column(from)[src_idx].clone();
    file_into(&mut task, to);
    board
        .with_column(from, |tasks| {
            tasks.remove(src_idx);
        })
        .with_column(to, |tasks| {
            let dest_idx = insert_index(tasks, before_id);
            tasks.insert(dest_idx, task);
        })
}

fn file_into(task: &mut Task, column: ColumnId) {
    if column == ColumnId::Done {
        task.completed = true;
    }
}

fn insert_index(tasks: &[Task], before_id: Option<&str>) -> usize {
    before_id
        .and_then(|id| tasks.iter().position(|t| t.id == id))
        .unwrap_or(tasks.len())
}

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

/// Issues timestamp-derived task ids (`2024-08-15T10:20:30.123Z`).
///
/// Ids are strictly increasing within one generator and never collide with
/// an id already on the board.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: Option<DateTime<Utc>>,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator::default()
    }

    pub fn next_id(&mut self, board: &Board) -> String {
        self.next_id_at(Utc::now(), board)
    }

    /// Same as `next_id` with an explicit clock reading
    pub fn next_id_at(&mut self, now: DateTime<Utc>, board: &Board) -> String {
        let step = TimeDelta::milliseconds(1);
        let mut at = now.trunc_subsecs(3);
        if let Some(last) = self.last
            && at <= last
        {
            at = last + step;
        }
        loop {
            let id = at.to_rfc3339_opts(SecondsFormat::Millis, true);
            if !board.contains_id(&id) {
                self.last = Some(at);
                return id;
            }
            at += step;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn ids(board: &Board, col: ColumnId) -> Vec<&str> {
        board.column(col).iter().map(|t| t.id.as_str()).collect()
    }

    fn board_abc() -> Board {
        Board::from_columns(
            vec![
                Task::new("a", "A", false),
                Task::new("b", "B", false),
                Task::new("c", "C", false),
            ],
            vec![Task::new("p", "P", false)],
            vec![Task::new("d", "D", true)],
        )
    }

    // --- add ---

    #[test]
    fn add_appends_open_task() {
        let board = Board::new();
        let (next, task) =
            add_task(&board, "t1".into(), "Buy milk", ColumnId::Todo, None).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(next.column(ColumnId::Todo), &[task]);
        assert!(board.is_empty());
    }

    #[test]
    fn add_to_done_starts_completed() {
        let (next, task) =
            add_task(&Board::new(), "t1".into(), "Ship", ColumnId::Done, None).unwrap();
        assert!(task.completed);
        assert!(next.column(ColumnId::Done)[0].completed);
    }

    #[test]
    fn add_trims_text_and_keeps_due_date() {
        let due = NaiveDate::from_ymd_opt(2024, 8, 15);
        let (_, task) =
            add_task(&Board::new(), "t1".into(), "  Write docs ", ColumnId::InProgress, due)
                .unwrap();
        assert_eq!(task.text, "Write docs");
        assert_eq!(task.due_date, due);
    }

    #[test]
    fn add_rejects_blank_text() {
        assert!(add_task(&Board::new(), "t1".into(), "   ", ColumnId::Todo, None).is_none());
        assert!(add_task(&Board::new(), "t1".into(), "", ColumnId::Todo, None).is_none());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let board = board_abc();
        assert!(add_task(&board, "p".into(), "Again", ColumnId::Done, None).is_none());
    }

    #[test]
    fn add_goes_to_end() {
        let (next, _) = add_task(&board_abc(), "z".into(), "Z", ColumnId::Todo, None).unwrap();
        assert_eq!(ids(&next, ColumnId::Todo), vec!["a", "b", "c", "z"]);
    }

    // --- toggle ---

    #[test]
    fn toggle_flips_completed() {
        let board = board_abc();
        let once = toggle_task(&board, "b", ColumnId::Todo);
        assert!(once.column(ColumnId::Todo)[1].completed);
        let twice = toggle_task(&once, "b", ColumnId::Todo);
        assert!(!twice.column(ColumnId::Todo)[1].completed);
        // Source board is never mutated
        assert!(!board.column(ColumnId::Todo)[1].completed);
    }

    #[test]
    fn toggle_in_done_can_reopen() {
        let next = toggle_task(&board_abc(), "d", ColumnId::Done);
        assert!(!next.column(ColumnId::Done)[0].completed);
    }

    #[test]
    fn toggle_wrong_column_is_noop() {
        let board = board_abc();
        let next = toggle_task(&board, "a", ColumnId::Done);
        assert!(next.same_as(&board));
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let board = board_abc();
        assert!(toggle_task(&board, "missing", ColumnId::Todo).same_as(&board));
    }

    // --- delete ---

    #[test]
    fn delete_removes_task() {
        let next = delete_task(&board_abc(), "b", ColumnId::Todo);
        assert_eq!(ids(&next, ColumnId::Todo), vec!["a", "c"]);
        assert!(!next.contains_id("b"));
    }

    #[test]
    fn delete_then_toggle_is_noop() {
        let deleted = delete_task(&board_abc(), "b", ColumnId::Todo);
        let toggled = toggle_task(&deleted, "b", ColumnId::Todo);
        assert!(toggled.same_as(&deleted));
        let again = delete_task(&deleted, "b", ColumnId::Todo);
        assert!(again.same_as(&deleted));
    }

    // --- move ---

    #[test]
    fn move_reorders_within_column() {
        let board = board_abc();
        let next = move_task(&board, "c", ColumnId::Todo, ColumnId::Todo, Some("a"));
        assert_eq!(ids(&next, ColumnId::Todo), vec!["c", "a", "b"]);
        assert!(next.shares_column(&board, ColumnId::InProgress));
        assert!(next.shares_column(&board, ColumnId::Done));
    }

    #[test]
    fn move_down_within_column() {
        let next = move_task(&board_abc(), "a", ColumnId::Todo, ColumnId::Todo, Some("c"));
        assert_eq!(ids(&next, ColumnId::Todo), vec!["b", "a", "c"]);
    }

    #[test]
    fn move_to_end_without_target() {
        let next = move_task(&board_abc(), "a", ColumnId::Todo, ColumnId::Todo, None);
        assert_eq!(ids(&next, ColumnId::Todo), vec!["b", "c", "a"]);
    }

    #[test]
    fn move_before_itself_keeps_position() {
        let next = move_task(&board_abc(), "b", ColumnId::Todo, ColumnId::Todo, Some("b"));
        assert_eq!(ids(&next, ColumnId::Todo), vec!["a", "b", "c"]);
    }

    #[test]
    fn move_across_columns_before_target() {
        let board = board_abc();
        let next = move_task(&board, "b", ColumnId::Todo, ColumnId::InProgress, Some("p"));
        assert_eq!(ids(&next, ColumnId::Todo), vec!["a", "c"]);
        assert_eq!(ids(&next, ColumnId::InProgress), vec!["b", "p"]);
        assert!(next.shares_column(&board, ColumnId::Done));
        assert_eq!(next.len(), board.len());
    }

    #[test]
    fn move_target_not_in_destination_appends() {
        // "a" lives in TODO, not in IN_PROGRESS
        let next = move_task(&board_abc(), "b", ColumnId::Todo, ColumnId::InProgress, Some("a"));
        assert_eq!(ids(&next, ColumnId::InProgress), vec!["p", "b"]);
    }

    #[test]
    fn move_into_empty_column() {
        let board = Board::from_columns(vec![Task::new("a", "A", false)], vec![], vec![]);
        let next = move_task(&board, "a", ColumnId::Todo, ColumnId::InProgress, None);
        assert!(next.column(ColumnId::Todo).is_empty());
        assert_eq!(ids(&next, ColumnId::InProgress), vec!["a"]);
    }

    #[test]
    fn move_into_done_completes() {
        let next = move_task(&board_abc(), "a", ColumnId::Todo, ColumnId::Done, None);
        let (col, task) = next.find("a").unwrap();
        assert_eq!(col, ColumnId::Done);
        assert!(task.completed);
    }

    #[test]
    fn move_out_of_done_stays_completed() {
        let next = move_task(&board_abc(), "d", ColumnId::Done, ColumnId::Todo, Some("a"));
        assert_eq!(ids(&next, ColumnId::Todo), vec!["d", "a", "b", "c"]);
        assert!(next.column(ColumnId::Todo)[0].completed);
    }

    #[test]
    fn move_within_done_recompletes() {
        let reopened = toggle_task(&board_abc(), "d", ColumnId::Done);
        let next = move_task(&reopened, "d", ColumnId::Done, ColumnId::Done, None);
        assert!(next.column(ColumnId::Done)[0].completed);
    }

    #[test]
    fn move_from_wrong_column_is_noop() {
        let board = board_abc();
        let next = move_task(&board, "a", ColumnId::InProgress, ColumnId::Done, None);
        assert!(next.same_as(&board));
    }

    #[test]
    fn move_never_duplicates() {
        let board = board_abc();
        for to in ColumnId::ALL {
            let next = move_task(&board, "b", ColumnId::Todo, to, None);
            assert_eq!(next.tasks().filter(|(_, t)| t.id == "b").count(), 1);
            assert_eq!(next.len(), board.len());
        }
    }

    // --- ids ---

    #[test]
    fn ids_are_iso_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 8, 15, 10, 20, 30).unwrap();
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id_at(now, &Board::new()), "2024-08-15T10:20:30.000Z");
    }

    #[test]
    fn ids_are_monotonic_under_a_frozen_clock() {
        let now = Utc.with_ymd_and_hms(2024, 8, 15, 10, 20, 30).unwrap();
        let mut ids = IdGenerator::new();
        let first = ids.next_id_at(now, &Board::new());
        let second = ids.next_id_at(now, &Board::new());
        let third = ids.next_id_at(now - TimeDelta::seconds(5), &Board::new());
        assert_eq!(second, "2024-08-15T10:20:30.001Z");
        assert_eq!(third, "2024-08-15T10:20:30.002Z");
        assert!(first < second && second < third);
    }

    #[test]
    fn ids_skip_ids_already_on_board() {
        let now = Utc.with_ymd_and_hms(2024, 8, 15, 10, 20, 30).unwrap();
        let board = Board::from_columns(
            vec![Task::new("2024-08-15T10:20:30.000Z", "taken", false)],
            vec![],
            vec![],
        );
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id_at(now, &board), "2024-08-15T10:20:30.001Z");
    }
}
