use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::board::Board;
use crate::model::column::ColumnId;
use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub overdue: bool,
}

/// Column key (`TODO`, ...) to tasks, in display order
pub type BoardJson = IndexMap<&'static str, Vec<TaskJson>>;

#[derive(Serialize)]
pub struct AddedJson {
    pub id: String,
    pub column: ColumnId,
}

#[derive(Serialize)]
pub struct WhoamiJson {
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub theme: String,
    /// True when no preference is saved and the terminal's is used
    pub system: bool,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, today: NaiveDate) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
        overdue: task.is_overdue(today),
    }
}

pub fn board_to_json(board: &Board, columns: &[ColumnId], today: NaiveDate) -> BoardJson {
    columns
        .iter()
        .map(|&col| {
            let tasks = board
                .column(col)
                .iter()
                .map(|t| task_to_json(t, today))
                .collect();
            (col.key(), tasks)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task, today: NaiveDate) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let due = match task.due_date {
        Some(d) if task.is_overdue(today) => format!("  due {} (overdue)", d.format("%Y-%m-%d")),
        Some(d) => format!("  due {}", d.format("%Y-%m-%d")),
        None => String::new(),
    };
    format!("[{}] {} {}{}", check, task.id, task.text, due)
}

/// Format the given columns as headed blocks separated by blank lines
pub fn format_board(board: &Board, columns: &[ColumnId], today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, &col) in columns.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let tasks = board.column(col);
        lines.push(format!("{} ({})", col.title(), tasks.len()));
        if tasks.is_empty() {
            lines.push("  (empty)".to_string());
        }
        for task in tasks {
            lines.push(format!("  {}", format_task_line(task, today)));
        }
    }
    lines
}
