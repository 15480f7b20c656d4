//! Content line folding.
//!
//! Lengths are counted in characters, not octets.

/// Longest physical line written by `fold_line`.
pub const MAX_LINE_CHARS: usize = 75;

/// Split one content line into physical lines (without terminators).
///
/// The first line carries up to 75 characters; every following line is a
/// single space plus up to 74 characters.
pub fn fold_line(line: &str) -> Vec<String> {
    let mut physical = Vec::new();
    let mut rest = line;
    let mut prefix = "";
    let mut limit = MAX_LINE_CHARS;

    loop {
        let split = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        physical.push(format!("{}{}", prefix, &rest[..split]));
        rest = &rest[split..];

        if rest.is_empty() {
            break;
        }
        prefix = " ";
        limit = MAX_LINE_CHARS - 1;
    }

    physical
}

/// Join folded lines back together.
///
/// A line break (CRLF or LF) followed by one space or tab is removed along
/// with that one whitespace character.
pub fn unfold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\n') {
        let head = &rest[..pos];
        let after = &rest[pos + 1..];

        if after.starts_with([' ', '\t']) {
            out.push_str(head.strip_suffix('\r').unwrap_or(head));
            rest = &after[1..];
        } else {
            out.push_str(head);
            out.push('\n');
            rest = after;
        }
    }
    out.push_str(rest);

    out
}
