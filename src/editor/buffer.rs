use std::collections::BTreeMap;

/// A text mutation reported by a buffer.
///
/// `from_line..=to_line` is the replaced range in the buffer as it was before
/// the edit; `inserted` holds the lines that took its place. [`LineBuffer`]
/// moves a queued event along with later edits, so a drained event always
/// refers to current line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub from_line: usize,
    pub to_line: usize,
    pub inserted: Vec<String>,
}

impl ChangeEvent {
    pub fn new(from_line: usize, to_line: usize, inserted: Vec<String>) -> Self {
        ChangeEvent {
            from_line,
            to_line,
            inserted,
        }
    }

    /// Last line index whose marker may be out of date after this change.
    /// Covers insertions that grow the buffer past the replaced range.
    pub fn affected_end(&self) -> usize {
        self.to_line.max(self.from_line + self.inserted.len())
    }
}

/// A click on the gutter of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub line: usize,
}

/// The two event sources the synchronizer reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Changed(ChangeEvent),
    Click(ClickEvent),
}

/// Line-oriented text storage with a separate annotation channel.
///
/// Every text mutation must queue a [`ChangeEvent`] retrievable with
/// [`TextBuffer::take_changes`]. Annotations are metadata and never queue
/// change events.
pub trait TextBuffer {
    /// Text of a line, or `None` past the end of the buffer
    fn line(&self, index: usize) -> Option<&str>;
    fn set_line(&mut self, index: usize, text: &str);
    fn line_count(&self) -> usize;
    fn annotate_line(&mut self, index: usize, glyph: &str);
    fn clear_annotation(&mut self, index: usize);
    fn annotation(&self, index: usize) -> Option<&str>;
    /// Drain queued change events, oldest first
    fn take_changes(&mut self) -> Vec<ChangeEvent>;
}

/// In-memory buffer backing the editor.
///
/// Always holds at least one (possibly empty) line. Annotations are keyed by
/// line index and move with their line when lines above are inserted or
/// removed.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
    annotations: BTreeMap<usize, String>,
    pending: Vec<ChangeEvent>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        LineBuffer {
            lines: vec![String::new()],
            annotations: BTreeMap::new(),
            pending: Vec::new(),
        }
    }
}

impl LineBuffer {
    /// Build a buffer from text without queueing a change event
    pub fn from_text(text: &str) -> Self {
        LineBuffer {
            lines: split_lines(text),
            ..Default::default()
        }
    }

    /// Full buffer text, lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replace the whole text. Reported as a single change over every line.
    pub fn set_text(&mut self, text: &str) {
        let last = self.lines.len() - 1;
        self.replace_range(0, last, split_lines(text));
    }

    /// Replace lines `from..=to` with `new_lines`.
    ///
    /// Annotations on replaced lines are dropped; annotations below the range
    /// shift by the change in line count. Out-of-range bounds are clamped.
    pub fn replace_range(&mut self, from: usize, to: usize, new_lines: Vec<String>) {
        let last = self.lines.len() - 1;
        let from = from.min(last);
        let to = to.clamp(from, last);
        let old_len = to - from + 1;
        let new_len = new_lines.len();

        self.lines.splice(from..=to, new_lines.iter().cloned());
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }

        let shifted: BTreeMap<usize, String> = std::mem::take(&mut self.annotations)
            .into_iter()
            .filter_map(|(idx, glyph)| {
                if idx < from {
                    Some((idx, glyph))
                } else if idx > to {
                    Some((idx - old_len + new_len, glyph))
                } else {
                    None
                }
            })
            .collect();
        self.annotations = shifted;

        self.rebase_pending(from, to, new_len);
        self.pending.push(ChangeEvent::new(from, to, new_lines));
    }

    /// Move queued events into the line numbers left by replacing
    /// `from..=to` with `new_len` lines. Events below the edit shift; an
    /// event reaching past `to` is widened to cover the edit.
    fn rebase_pending(&mut self, from: usize, to: usize, new_len: usize) {
        let old_len = to - from + 1;
        for event in &mut self.pending {
            let end = event.affected_end();
            if event.from_line > to {
                event.from_line = event.from_line - old_len + new_len;
                event.to_line = event.to_line - old_len + new_len;
            } else if end > to {
                event.from_line = event.from_line.min(from);
                event.to_line = end - old_len + new_len;
            }
        }
    }

    /// Insert `new_lines` before line `at` (`at == line_count()` appends)
    pub fn insert_lines(&mut self, at: usize, new_lines: Vec<String>) {
        if new_lines.is_empty() {
            return;
        }
        let count = self.lines.len();
        if at >= count {
            let last = count - 1;
            let mut replacement = vec![self.lines[last].clone()];
            replacement.extend(new_lines);
            self.replace_range(last, last, replacement);
        } else {
            let mut replacement = new_lines;
            replacement.push(self.lines[at].clone());
            self.replace_range(at, at, replacement);
        }
    }

    /// Remove lines `from..=to`. Removing every line leaves one empty line.
    pub fn remove_lines(&mut self, from: usize, to: usize) {
        self.replace_range(from, to, Vec::new());
    }

    /// Insert `text` (which may span lines) at a byte column of a line.
    /// Returns the cursor position just after the inserted text.
    pub fn insert_text(&mut self, line: usize, col: usize, text: &str) -> (usize, usize) {
        let line = line.min(self.lines.len() - 1);
        let current = &self.lines[line];
        let col = floor_char_boundary(current, col);
        let (left, right) = current.split_at(col);

        let mut pieces = split_lines(text);
        let last_idx = pieces.len() - 1;
        let end_col = if last_idx == 0 {
            left.len() + pieces[0].len()
        } else {
            pieces[last_idx].len()
        };
        pieces[0] = format!("{}{}", left, pieces[0]);
        pieces[last_idx].push_str(right);

        if pieces.len() == 1 {
            let text = pieces.remove(0);
            self.set_line(line, &text);
        } else {
            self.replace_range(line, line, pieces);
        }
        (line + last_idx, end_col)
    }

    /// Join line `index` with the line below it. No-op on the last line.
    pub fn join_with_next(&mut self, index: usize) {
        if index + 1 >= self.lines.len() {
            return;
        }
        let joined = format!("{}{}", self.lines[index], self.lines[index + 1]);
        self.replace_range(index, index + 1, vec![joined]);
    }

    /// Whether any change events are waiting to be drained
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl TextBuffer for LineBuffer {
    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|s| s.as_str())
    }

    fn set_line(&mut self, index: usize, text: &str) {
        if index >= self.lines.len() {
            return;
        }
        self.replace_range(index, index, vec![text.to_string()]);
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn annotate_line(&mut self, index: usize, glyph: &str) {
        if index < self.lines.len() {
            self.annotations.insert(index, glyph.to_string());
        }
    }

    fn clear_annotation(&mut self, index: usize) {
        self.annotations.remove(&index);
    }

    fn annotation(&self, index: usize) -> Option<&str> {
        self.annotations.get(&index).map(|s| s.as_str())
    }

    fn take_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Split text into lines on `\n`, dropping a `\r` before each break.
/// Always yields at least one line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
}

/// Largest char boundary of `s` that is `<= idx`
fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
