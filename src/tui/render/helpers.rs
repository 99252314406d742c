use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Checkbox for a task's completion flag
pub(super) fn check_symbol(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Push `right` flush against the right edge when it fits after `spans`
pub(super) fn push_right_aligned<'a>(
    spans: &mut Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    width: usize,
    fill: Style,
) {
    let left_width = spans_width(spans);
    let right_width = spans_width(&right);
    if left_width + right_width < width {
        spans.push(Span::styled(" ".repeat(width - left_width - right_width), fill));
        spans.extend(right);
    }
}
