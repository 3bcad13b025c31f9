use crate::model::status::Status;
use crate::ops::cycle;
use crate::parse::classify::{classify, strip_marker};

use super::buffer::{ChangeEvent, EditorEvent, TextBuffer};

/// Gutter glyph for the active task (●)
pub const ACTIVE_GLYPH: &str = "\u{25CF}";

/// What happens to other active lines when a gutter click activates a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivePolicy {
    /// Leave them alone; `find_active_task` reports the first one
    #[default]
    Tolerate,
    /// Demote every other active line back to pending
    Exclusive,
}

/// Keeps buffer text and the per-line active annotation consistent.
///
/// Owns its buffer. Text changes reach it as [`ChangeEvent`]s (see
/// [`Synchronizer::pump`]); gutter clicks rewrite text directly.
#[derive(Debug, Clone)]
pub struct Synchronizer<B: TextBuffer> {
    buffer: B,
    glyph: String,
    policy: ActivePolicy,
}

impl<B: TextBuffer> Synchronizer<B> {
    /// Wrap a buffer and annotate every line from its current text
    pub fn new(buffer: B) -> Self {
        let mut sync = Synchronizer {
            buffer,
            glyph: ACTIVE_GLYPH.to_string(),
            policy: ActivePolicy::default(),
        };
        sync.refresh_all();
        sync
    }

    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = glyph.into();
        self.refresh_all();
        self
    }

    pub fn with_policy(mut self, policy: ActivePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Mutable buffer access for the editing host. Edits made through it are
    /// picked up on the next [`Synchronizer::pump`], however many happen in
    /// between, as long as the buffer keeps queued events in step with later
    /// edits the way [`crate::editor::LineBuffer`] does.
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> B {
        self.buffer
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn policy(&self) -> ActivePolicy {
        self.policy
    }

    /// Current status of a line; lines past the end read as empty
    pub fn status_of(&self, line: usize) -> Status {
        classify(self.buffer.line(line).unwrap_or(""))
    }

    /// Route an event from the host to the matching handler
    pub fn dispatch(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::Changed(change) => self.on_text_changed(&change),
            EditorEvent::Click(click) => {
                self.on_gutter_click(click.line);
            }
        }
    }

    /// Cycle a line's status and rewrite its text to match.
    ///
    /// Returns the new status, or `None` when the click changed nothing
    /// (comment lines, lines past the end).
    pub fn on_gutter_click(&mut self, line: usize) -> Option<Status> {
        let text = self.buffer.line(line)?.to_string();
        let new_text = cycle::cycle_line(&text)?;
        self.buffer.set_line(line, &new_text);
        let status = classify(&new_text);
        tracing::debug!(line, ?status, "gutter click");

        if status == Status::Active && self.policy == ActivePolicy::Exclusive {
            self.demote_other_active(line);
        }

        self.update_visual_marker(line);
        // Our own set_line queued change events; reacting to them only
        // re-annotates lines we just handled.
        self.pump();
        Some(status)
    }

    fn demote_other_active(&mut self, keep: usize) {
        for idx in 0..self.buffer.line_count() {
            if idx == keep {
                continue;
            }
            let Some(text) = self.buffer.line(idx) else {
                continue;
            };
            if classify(text) == Status::Active {
                let demoted = cycle::deactivate(text);
                tracing::debug!(line = idx, "demoting previously active line");
                self.buffer.set_line(idx, &demoted);
                self.update_visual_marker(idx);
            }
        }
    }

    /// Re-annotate the lines a change touched. Lines outside the range keep
    /// whatever annotation they had.
    pub fn on_text_changed(&mut self, change: &ChangeEvent) {
        let count = self.buffer.line_count();
        if count == 0 {
            return;
        }
        let start = change.from_line.min(count - 1);
        let end = change.affected_end().min(count - 1);
        for line in start..=end {
            self.update_visual_marker(line);
        }
    }

    /// Annotate the line with the active glyph if it is active, otherwise
    /// clear its annotation.
    pub fn update_visual_marker(&mut self, line: usize) {
        if self.status_of(line) == Status::Active {
            if self.buffer.annotation(line) != Some(self.glyph.as_str()) {
                let glyph = self.glyph.clone();
                self.buffer.annotate_line(line, &glyph);
            }
        } else if self.buffer.annotation(line).is_some() {
            self.buffer.clear_annotation(line);
        }
    }

    /// Re-annotate every line. Used after loading or replacing the document.
    pub fn refresh_all(&mut self) {
        for line in 0..self.buffer.line_count() {
            self.update_visual_marker(line);
        }
    }

    /// Drain the buffer's queued change events and react to each.
    /// Returns how many events were handled.
    pub fn pump(&mut self) -> usize {
        let changes = self.buffer.take_changes();
        for change in &changes {
            self.on_text_changed(change);
        }
        changes.len()
    }

    /// Body of the first active line, if any. Never mutates the buffer.
    pub fn find_active_task(&self) -> Option<String> {
        find_active_task(&self.buffer)
    }

    /// Indices of every active line, in order
    pub fn active_lines(&self) -> Vec<usize> {
        active_lines(&self.buffer)
    }
}

/// Body of the first active line in `buffer`
pub fn find_active_task<B: TextBuffer + ?Sized>(buffer: &B) -> Option<String> {
    (0..buffer.line_count())
        .filter_map(|idx| buffer.line(idx))
        .find(|text| classify(text) == Status::Active)
        .map(|text| strip_marker(text).to_string())
}

/// Indices of every active line in `buffer`
pub fn active_lines<B: TextBuffer + ?Sized>(buffer: &B) -> Vec<usize> {
    (0..buffer.line_count())
        .filter(|&idx| buffer.line(idx).is_some_and(|t| classify(t) == Status::Active))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::buffer::{ClickEvent, LineBuffer};
    use pretty_assertions::assert_eq;

    fn sync_with(lines: &[&str]) -> Synchronizer<LineBuffer> {
        Synchronizer::new(LineBuffer::from_text(&lines.join("\n")))
    }

    /// Buffer that records every annotation call, for checking locality
    #[derive(Default)]
    struct RecordingBuffer {
        lines: Vec<String>,
        annotations: Vec<Option<String>>,
        touched: Vec<usize>,
        pending: Vec<ChangeEvent>,
    }

    impl RecordingBuffer {
        fn new(lines: &[&str]) -> Self {
            RecordingBuffer {
                lines: lines.iter().map(|s| s.to_string()).collect(),
                annotations: vec![None; lines.len()],
                ..Default::default()
            }
        }
    }

    impl TextBuffer for RecordingBuffer {
        fn line(&self, index: usize) -> Option<&str> {
            self.lines.get(index).map(|s| s.as_str())
        }
        fn set_line(&mut self, index: usize, text: &str) {
            self.lines[index] = text.to_string();
            self.pending
                .push(ChangeEvent::new(index, index, vec![text.to_string()]));
        }
        fn line_count(&self) -> usize {
            self.lines.len()
        }
        fn annotate_line(&mut self, index: usize, glyph: &str) {
            self.touched.push(index);
            self.annotations[index] = Some(glyph.to_string());
        }
        fn clear_annotation(&mut self, index: usize) {
            self.touched.push(index);
            self.annotations[index] = None;
        }
        fn annotation(&self, index: usize) -> Option<&str> {
            self.annotations[index].as_deref()
        }
        fn take_changes(&mut self) -> Vec<ChangeEvent> {
            std::mem::take(&mut self.pending)
        }
    }

    #[test]
    fn new_annotates_existing_active_lines() {
        let sync = sync_with(&["Buy milk", "+ Call bank", "X Pay rent"]);
        assert_eq!(sync.buffer().annotation(0), None);
        assert_eq!(sync.buffer().annotation(1), Some(ACTIVE_GLYPH));
        assert_eq!(sync.buffer().annotation(2), None);
    }

    #[test]
    fn find_active_task_returns_body() {
        let sync = sync_with(&["Buy milk", "+ Call bank", "X Pay rent"]);
        assert_eq!(sync.find_active_task().as_deref(), Some("Call bank"));
    }

    #[test]
    fn find_active_task_none_without_active_line() {
        let sync = sync_with(&["Buy milk", "X Pay rent", "# + not active"]);
        assert_eq!(sync.find_active_task(), None);
    }

    #[test]
    fn find_active_task_prefers_lowest_index() {
        let sync = sync_with(&["+ first", "middle", "  + second"]);
        assert_eq!(sync.find_active_task().as_deref(), Some("first"));
        assert_eq!(sync.active_lines(), vec![0, 2]);
    }

    #[test]
    fn find_active_task_never_returns_comment() {
        let sync = sync_with(&["# + looks active", "# note to self"]);
        assert_eq!(sync.find_active_task(), None);
    }

    #[test]
    fn click_pending_line_activates_and_marks() {
        let mut sync = sync_with(&["Buy milk"]);
        assert_eq!(sync.on_gutter_click(0), Some(Status::Active));
        assert_eq!(sync.buffer().line(0), Some("+ Buy milk"));
        assert_eq!(sync.buffer().annotation(0), Some(ACTIVE_GLYPH));
        assert!(!sync.buffer().has_pending_changes());
    }

    #[test]
    fn click_cycles_through_all_states() {
        let mut sync = sync_with(&["Buy milk"]);
        assert_eq!(sync.on_gutter_click(0), Some(Status::Active));
        assert_eq!(sync.on_gutter_click(0), Some(Status::Closed));
        assert_eq!(sync.buffer().line(0), Some("X Buy milk"));
        assert_eq!(sync.buffer().annotation(0), None);
        assert_eq!(sync.on_gutter_click(0), Some(Status::Pending));
        assert_eq!(sync.buffer().line(0), Some("Buy milk"));
        assert_eq!(sync.buffer().annotation(0), None);
    }

    #[test]
    fn click_on_comment_is_noop() {
        let mut sync = sync_with(&["# note to self"]);
        assert_eq!(sync.on_gutter_click(0), None);
        assert_eq!(sync.buffer().line(0), Some("# note to self"));
        assert!(!sync.buffer().has_pending_changes());
    }

    #[test]
    fn click_past_end_is_noop() {
        let mut sync = sync_with(&["a"]);
        assert_eq!(sync.on_gutter_click(3), None);
        assert_eq!(sync.buffer().text(), "a");
    }

    #[test]
    fn tolerate_policy_allows_two_active_lines() {
        let mut sync = sync_with(&["+ first", "second"]);
        sync.on_gutter_click(1);
        assert_eq!(sync.active_lines(), vec![0, 1]);
        assert_eq!(sync.find_active_task().as_deref(), Some("first"));
    }

    #[test]
    fn exclusive_policy_demotes_previous_active() {
        let mut sync = sync_with(&["+ first", "second", "  + third"])
            .with_policy(ActivePolicy::Exclusive);
        sync.on_gutter_click(1);
        assert_eq!(sync.buffer().text(), "first\n+ second\n  third");
        assert_eq!(sync.active_lines(), vec![1]);
        assert_eq!(sync.buffer().annotation(0), None);
        assert_eq!(sync.buffer().annotation(1), Some(ACTIVE_GLYPH));
        assert_eq!(sync.buffer().annotation(2), None);
    }

    #[test]
    fn exclusive_policy_only_applies_on_activation() {
        let mut sync =
            sync_with(&["+ first", "+ second"]).with_policy(ActivePolicy::Exclusive);
        // Closing a line does not touch the other active line
        sync.on_gutter_click(1);
        assert_eq!(sync.buffer().text(), "+ first\nX second");
    }

    #[test]
    fn text_edit_updates_marker_via_pump() {
        let mut sync = sync_with(&["Buy milk", "Call bank"]);
        sync.buffer_mut().set_line(1, "+ Call bank");
        assert_eq!(sync.buffer().annotation(1), None);
        assert_eq!(sync.pump(), 1);
        assert_eq!(sync.buffer().annotation(1), Some(ACTIVE_GLYPH));

        sync.buffer_mut().set_line(1, "Call bank");
        sync.pump();
        assert_eq!(sync.buffer().annotation(1), None);
    }

    #[test]
    fn inserting_lines_above_keeps_marker_on_moved_line() {
        let mut sync = sync_with(&["a", "+ b"]);
        sync.buffer_mut().insert_lines(0, vec!["x".into(), "y".into()]);
        sync.pump();
        assert_eq!(sync.buffer().annotation(3), Some(ACTIVE_GLYPH));
        assert_eq!(sync.buffer().annotation(1), None);
    }

    #[test]
    fn deleting_active_line_clears_marker() {
        let mut sync = sync_with(&["a", "+ b", "c"]);
        sync.buffer_mut().remove_lines(1, 1);
        sync.pump();
        assert_eq!(sync.buffer().text(), "a\nc");
        assert_eq!(sync.buffer().annotation(0), None);
        assert_eq!(sync.buffer().annotation(1), None);
        assert_eq!(sync.find_active_task(), None);
    }

    #[test]
    fn text_change_only_touches_changed_range() {
        let mut buffer = RecordingBuffer::new(&["+ a", "b", "c", "d"]);
        // Line 0 is active but deliberately left unannotated
        buffer.lines[1] = "+ b".into();
        let mut sync = Synchronizer {
            buffer,
            glyph: ACTIVE_GLYPH.to_string(),
            policy: ActivePolicy::Tolerate,
        };

        sync.on_text_changed(&ChangeEvent::new(1, 1, vec![]));
        assert_eq!(sync.buffer().touched, vec![1]);
        assert_eq!(sync.buffer().annotation(1), Some(ACTIVE_GLYPH));
        // Stale relative to a full rescan, and left that way
        assert_eq!(sync.buffer().annotation(0), None);
    }

    #[test]
    fn text_change_covers_inserted_lines() {
        let mut buffer = RecordingBuffer::new(&["a", "+ b", "+ c", "d"]);
        buffer.touched.clear();
        let mut sync = Synchronizer {
            buffer,
            glyph: ACTIVE_GLYPH.to_string(),
            policy: ActivePolicy::Tolerate,
        };
        sync.on_text_changed(&ChangeEvent::new(0, 0, vec!["a".into(), "+ b".into(), "+ c".into()]));
        // from 0 to max(0, 0 + 3) = 3; only active lines get a call
        assert_eq!(sync.buffer().touched, vec![1, 2]);
    }

    #[test]
    fn text_change_range_is_clamped() {
        let mut sync = sync_with(&["+ a"]);
        sync.on_text_changed(&ChangeEvent::new(0, 10, vec![]));
        assert_eq!(sync.buffer().annotation(0), Some(ACTIVE_GLYPH));
    }

    #[test]
    fn update_visual_marker_is_idempotent() {
        let mut buffer = RecordingBuffer::new(&["+ a", "b"]);
        buffer.touched.clear();
        let mut sync = Synchronizer {
            buffer,
            glyph: ACTIVE_GLYPH.to_string(),
            policy: ActivePolicy::Tolerate,
        };
        sync.update_visual_marker(0);
        sync.update_visual_marker(0);
        sync.update_visual_marker(1);
        sync.update_visual_marker(1);
        assert_eq!(sync.buffer().touched, vec![0]);
        assert_eq!(sync.buffer().annotation(0), Some(ACTIVE_GLYPH));
    }

    #[test]
    fn custom_glyph() {
        let sync = sync_with(&["+ a"]).with_glyph(">");
        assert_eq!(sync.buffer().annotation(0), Some(">"));
    }

    #[test]
    fn dispatch_routes_events() {
        let mut sync = sync_with(&["a", "b"]);
        sync.dispatch(EditorEvent::Click(ClickEvent { line: 1 }));
        assert_eq!(sync.buffer().text(), "a\n+ b");
        sync.buffer_mut().set_line(0, "+ a");
        let changes = sync.buffer_mut().take_changes();
        for change in changes {
            sync.dispatch(EditorEvent::Changed(change));
        }
        assert_eq!(sync.buffer().annotation(0), Some(ACTIVE_GLYPH));
    }

    #[test]
    fn find_active_task_has_no_side_effects() {
        let sync = sync_with(&["+ a"]);
        let before = sync.buffer().text();
        let _ = sync.find_active_task();
        let _ = sync.find_active_task();
        assert_eq!(sync.buffer().text(), before);
        assert!(!sync.buffer().has_pending_changes());
    }
}
