use crate::model::status::Status;
use crate::parse::classify::classify;

/// The status a gutter click moves to, or `None` for lines outside the cycle
pub fn next_status(status: Status) -> Option<Status> {
    match status {
        Status::Pending => Some(Status::Active),
        Status::Active => Some(Status::Closed),
        Status::Closed => Some(Status::Pending),
        Status::Comment => None,
    }
}

/// Rewrite `line` to the next status in the Pending → Active → Closed cycle.
///
/// Returns `None` when the line is a comment, which gutter clicks leave alone.
pub fn cycle_line(line: &str) -> Option<String> {
    let text = match classify(line) {
        Status::Pending => activate(line),
        Status::Active => close(line),
        Status::Closed => reopen(line),
        Status::Comment => return None,
    };
    Some(text)
}

/// Pending → Active: prepend `"+ "` to the line as it stands.
fn activate(line: &str) -> String {
    format!("+ {}", line)
}

/// Active → Closed: the first `+` becomes `X`, in place.
fn close(line: &str) -> String {
    match line.find('+') {
        Some(pos) => format!("{}X{}", &line[..pos], &line[pos + 1..]),
        None => line.to_string(),
    }
}

/// Closed → Pending: drop the first `X` and the whitespace run after it.
fn reopen(line: &str) -> String {
    remove_marker(line, 'X')
}

/// Active → Pending, used when another line takes over as the active task.
pub fn deactivate(line: &str) -> String {
    remove_marker(line, '+')
}

fn remove_marker(line: &str, marker: char) -> String {
    match line.find(marker) {
        Some(pos) => {
            let after = &line[pos + marker.len_utf8()..];
            format!("{}{}", &line[..pos], after.trim_start())
        }
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pending_to_active_prepends_marker() {
        assert_eq!(cycle_line("Buy milk").as_deref(), Some("+ Buy milk"));
    }

    #[test]
    fn active_to_closed_swaps_marker() {
        assert_eq!(cycle_line("+ Call bank").as_deref(), Some("X Call bank"));
        assert_eq!(cycle_line("+Call +1").as_deref(), Some("XCall +1"));
    }

    #[test]
    fn closed_to_pending_drops_marker_and_spacing() {
        assert_eq!(cycle_line("X   Pay rent").as_deref(), Some("Pay rent"));
        assert_eq!(cycle_line("XPay rent").as_deref(), Some("Pay rent"));
    }

    #[test]
    fn comment_is_not_cycled() {
        assert_eq!(cycle_line("# note to self"), None);
        assert_eq!(next_status(Status::Comment), None);
    }

    #[test]
    fn three_clicks_restore_unindented_text() {
        for original in ["Buy milk", "", "x lower", "Trailing  "] {
            let once = cycle_line(original).unwrap();
            let twice = cycle_line(&once).unwrap();
            let thrice = cycle_line(&twice).unwrap();
            assert_eq!(classify(&once), Status::Active);
            assert_eq!(classify(&twice), Status::Closed);
            assert_eq!(thrice, original, "cycle of {:?}", original);
        }
    }

    #[test]
    fn indented_line_gets_marker_in_front() {
        let once = cycle_line("  task").unwrap();
        assert_eq!(once, "+   task");
        let twice = cycle_line(&once).unwrap();
        assert_eq!(twice, "X   task");
        // Reopening drops the whitespace run along with the marker
        assert_eq!(cycle_line(&twice).as_deref(), Some("task"));
    }

    #[test]
    fn indented_markers_still_cycle_in_place() {
        assert_eq!(cycle_line("  + task").as_deref(), Some("  X task"));
        assert_eq!(cycle_line("  X task").as_deref(), Some("  task"));
    }

    #[test]
    fn next_status_follows_cycle() {
        assert_eq!(next_status(Status::Pending), Some(Status::Active));
        assert_eq!(next_status(Status::Active), Some(Status::Closed));
        assert_eq!(next_status(Status::Closed), Some(Status::Pending));
    }

    #[test]
    fn deactivate_returns_line_to_pending() {
        assert_eq!(deactivate("+ Call bank"), "Call bank");
        assert_eq!(deactivate("  +  Call bank"), "  Call bank");
        assert_eq!(classify(&deactivate("+ x")), Status::Pending);
    }
}
