//! Delimiter-based splitting for record-structured documents.
//!
//! Splits on a literal (non-regex) separator and extracts a short context
//! header from each piece so that identifying lines (a record's key fields)
//! can be re-attached when an oversized piece is subdivided.

/// Split text on a literal delimiter.
///
/// Consecutive delimiters produce empty pieces; they are kept, since
/// filtering is the caller's decision. Empty input produces no pieces.
///
/// # Examples
///
/// ```
/// use textvault::delimiter::split_with_delimiter;
///
/// let pieces = split_with_delimiter("a--b----c", "--");
/// assert_eq!(pieces, vec!["a", "b", "", "c"]);
/// ```
pub fn split_with_delimiter(text: &str, delimiter: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    text.split(delimiter).map(str::to_string).collect()
}

/// Extract the first `count` non-blank lines of a piece, each trimmed,
/// joined by newlines.
///
/// Returns an empty string when the piece is empty, `count` is zero, or no
/// non-blank line exists.
pub fn leading_lines(text: &str, count: usize) -> String {
    if text.is_empty() || count == 0 {
        return String::new();
    }

    let mut lines = Vec::with_capacity(count);
    for line in text.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
            if lines.len() >= count {
                break;
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_round_trips_through_join() {
        let text = "alpha\n---\nbeta\n---\ngamma";
        let pieces = split_with_delimiter(text, "---");
        assert_eq!(pieces.join("---"), text);
    }

    #[test]
    fn consecutive_delimiters_keep_empty_pieces() {
        let pieces = split_with_delimiter("a,,b", ",");
        assert_eq!(pieces, vec!["a", "", "b"]);
    }

    #[test]
    fn no_delimiter_match_single_piece() {
        let pieces = split_with_delimiter("no separators here", "|");
        assert_eq!(pieces, vec!["no separators here"]);
    }

    #[test]
    fn empty_input_yields_no_pieces() {
        assert!(split_with_delimiter("", ",").is_empty());
    }

    #[test]
    fn leading_lines_skips_blanks_and_trims() {
        let text = "\n  \nName: widget  \n\n  SKU: 42\nDescription: long\n";
        assert_eq!(leading_lines(text, 2), "Name: widget\nSKU: 42");
    }

    #[test]
    fn leading_lines_fewer_than_requested() {
        assert_eq!(leading_lines("only one line", 3), "only one line");
    }

    #[test]
    fn leading_lines_empty_cases() {
        assert_eq!(leading_lines("", 2), "");
        assert_eq!(leading_lines("text", 0), "");
        assert_eq!(leading_lines("\n   \n\t\n", 2), "");
    }
}
