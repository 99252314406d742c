use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Display width in terminal cells. Line breaks and tabs count as one cell,
/// matching how `single_line` renders them.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Flatten task text onto one row: `\n`, `\r` and `\t` become spaces.
pub fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

/// Fit `s` into `max_cells`, flattened to one row. Text that does not fit
/// is cut on a grapheme boundary and ends in `…`.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    let line = single_line(s);
    if display_width(&line) <= max_cells {
        return line;
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in line.graphemes(true) {
        let w = grapheme_width(g);
        if width + w > budget {
            break;
        }
        width += w;
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Start of the grapheme that ends at `byte_offset`, or `None` at the start.
/// Backspace in the prompts removes `s[prev..byte_offset]`.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}

fn grapheme_width(g: &str) -> usize {
    if g.chars().all(|c| matches!(c, '\n' | '\r' | '\t')) {
        return 1;
    }
    UnicodeWidthStr::width(g)
}
