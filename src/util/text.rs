//! Grapheme- and width-aware helpers for editing single lines.
//!
//! Columns are terminal cells; offsets are byte offsets into the line.
//! Tabs are rendered as [`TAB_WIDTH`] cells.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub const TAB_WIDTH: usize = 4;

fn cell_width(grapheme: &str) -> usize {
    if grapheme == "\t" {
        TAB_WIDTH
    } else {
        UnicodeWidthStr::width(grapheme)
    }
}

fn is_blank(grapheme: &str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(cell_width).sum()
}

/// Replace tabs with spaces so rendered width matches [`display_width`]
pub fn expand_tabs(s: &str) -> String {
    s.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Truncate to at most `max_cells` cells, ending in `…` when shortened
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let w = cell_width(g);
        if used + w > max_cells - 1 {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Offset of the grapheme after the one at `offset`, or `None` at the end
pub fn next_boundary(s: &str, offset: usize) -> Option<usize> {
    let g = s.get(offset..)?.graphemes(true).next()?;
    Some(offset + g.len())
}

/// Offset of the grapheme before `offset`, or `None` at the start
pub fn prev_boundary(s: &str, offset: usize) -> Option<usize> {
    let g = s.get(..offset)?.graphemes(true).next_back()?;
    Some(offset - g.len())
}

/// Cell column at which `offset` is drawn
pub fn col_of_offset(s: &str, offset: usize) -> usize {
    display_width(&s[..offset.min(s.len())])
}

/// Offset of the grapheme drawn at cell `col`; past the end gives `s.len()`
pub fn offset_at_col(s: &str, col: usize) -> usize {
    let mut used = 0;
    for (i, g) in s.grapheme_indices(true) {
        used += cell_width(g);
        if used > col {
            return i;
        }
    }
    s.len()
}

/// Start of the word at or before `offset` (whitespace-delimited)
pub fn word_left(s: &str, offset: usize) -> usize {
    let graphemes: Vec<(usize, &str)> = s[..offset.min(s.len())].grapheme_indices(true).collect();
    let mut idx = graphemes.len();
    while idx > 0 && is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_blank(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

/// Start of the next word after `offset`, or the end of the line
pub fn word_right(s: &str, offset: usize) -> usize {
    let start = offset.min(s.len());
    let mut iter = s[start..].grapheme_indices(true).peekable();
    while iter.next_if(|(_, g)| !is_blank(g)).is_some() {}
    while iter.next_if(|(_, g)| is_blank(g)).is_some() {}
    iter.peek().map_or(s.len(), |(i, _)| start + i)
}
