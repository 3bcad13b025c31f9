use crate::model::status::Status;

/// Derive a line's status from its first non-whitespace character.
///
/// Total over all input: anything without a recognized marker is `Pending`.
pub fn classify(line: &str) -> Status {
    line.trim_start()
        .chars()
        .next()
        .and_then(Status::from_marker)
        .unwrap_or(Status::Pending)
}

/// Strip indentation, a leading status marker, and the whitespace run that
/// follows the marker. Lines without a marker only lose their indentation.
pub fn strip_marker(line: &str) -> &str {
    let rest = line.trim_start();
    match rest.chars().next() {
        Some(c) if Status::from_marker(c).is_some() => rest[c.len_utf8()..].trim_start(),
        _ => rest,
    }
}

/// Byte length of the leading whitespace of `line`
pub fn indent_len(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
