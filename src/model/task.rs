use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier, unique across the whole board
    pub id: String,
    /// Task text (never empty after trimming)
    pub text: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Optional due date (`YYYY-MM-DD` on the wire)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>, completed: bool) -> Self {
        Task {
            id: id.into(),
            text: text.into(),
            completed,
            due_date: None,
        }
    }

    /// Builder-style setter for the due date
    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// A task is overdue when its due date has passed and it is still open.
    /// Due today is not overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Parse a `YYYY-MM-DD` due date
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_due_date(s).unwrap()
    }

    #[test]
    fn overdue_only_when_open_and_past() {
        let today = date("2024-08-15");
        let task = Task::new("1", "Ship it", false).with_due_date(Some(date("2024-08-14")));
        assert!(task.is_overdue(today));

        let due_today = Task::new("2", "Today", false).with_due_date(Some(today));
        assert!(!due_today.is_overdue(today));

        let done = Task::new("3", "Done", true).with_due_date(Some(date("2020-01-01")));
        assert!(!done.is_overdue(today));

        let no_date = Task::new("4", "Whenever", false);
        assert!(!no_date.is_overdue(today));
    }

    #[test]
    fn serde_shape_matches_stored_blob() {
        let task = Task::new("1", "Add a dark mode toggle", true)
            .with_due_date(Some(date("2023-10-01")));
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","text":"Add a dark mode toggle","completed":true,"dueDate":"2023-10-01"}"#
        );
    }

    #[test]
    fn serde_omits_missing_due_date() {
        let task = Task::new("3", "Scope tasks", false);
        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("dueDate"));
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn parse_due_date_rejects_garbage() {
        assert_eq!(parse_due_date(" 2024-02-29 "), Some(date("2024-02-29")));
        assert_eq!(parse_due_date("2023-02-29"), None);
        assert_eq!(parse_due_date("tomorrow"), None);
    }
}
