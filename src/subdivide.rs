//! Oversize subdivision: the fallback applied when a semantically produced
//! piece is larger than the embedding backend can represent.
//!
//! Pieces are re-chunked with [`crate::chunking::chunk_text`] at zero
//! overlap, so no stored chunk ever exceeds the caller's size limit. The
//! limit is measured in chars, the same unit the chunker uses.

use crate::chunking::chunk_text;

/// Joiner between a re-attached context header and a sub-piece.
const HEADER_JOIN: &str = "\n\n";

/// Replace an oversized piece with zero-overlap windows of at most `limit`
/// chars. A piece within the limit is returned unchanged as a single
/// element.
///
/// # Panics
///
/// Panics if `limit == 0`; callers validate the limit before splitting.
pub fn enforce_size_limit(piece: &str, limit: usize) -> Vec<String> {
    assert!(limit > 0, "size limit must be greater than zero");

    if piece.chars().count() <= limit {
        return vec![piece.to_string()];
    }

    chunk_text(piece, limit, 0)
}

/// Like [`enforce_size_limit`], but re-attaches `header` to every sub-piece
/// after the first, joined by a blank line, so identifying context cut away
/// from the piece's tail is preserved. The first sub-piece already contains
/// the header and is left alone; with an empty header this is identical to
/// [`enforce_size_limit`].
///
/// Re-prepending happens after the size check, so sub-pieces other than the
/// first may exceed `limit` by the header's length.
pub fn enforce_size_limit_with_header(
    piece: &str,
    header: &str,
    limit: usize,
) -> Vec<String> {
    let mut pieces = enforce_size_limit(piece, limit);

    if !header.is_empty() && pieces.len() > 1 {
        for sub in pieces.iter_mut().skip(1) {
            *sub = format!("{header}{HEADER_JOIN}{sub}");
        }
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_within_limit_unchanged() {
        let pieces = enforce_size_limit("short", 100);
        assert_eq!(pieces, vec!["short"]);
    }

    #[test]
    fn oversized_piece_split_at_limit() {
        let piece = "x".repeat(25);
        let pieces = enforce_size_limit(&piece, 10);

        assert_eq!(pieces.len(), 3);
        for sub in &pieces {
            assert!(sub.chars().count() <= 10);
        }
        assert_eq!(pieces.concat(), piece);
    }

    #[test]
    fn header_prepended_to_all_but_first() {
        let piece = "KEY: 7\n".to_string() + &"y".repeat(40);
        let pieces = enforce_size_limit_with_header(&piece, "KEY: 7", 20);

        assert!(pieces.len() > 1);
        assert!(pieces[0].starts_with("KEY: 7\n"));
        assert!(!pieces[0].starts_with("KEY: 7\n\nKEY"));
        for sub in &pieces[1..] {
            assert!(sub.starts_with("KEY: 7\n\n"));
        }
    }

    #[test]
    fn prepended_subpieces_may_exceed_limit() {
        // The size bound holds before re-prepending; afterwards the header
        // is allowed to push later sub-pieces past it.
        let piece = "z".repeat(30);
        let pieces = enforce_size_limit_with_header(&piece, "HEADER LINE", 10);

        assert!(pieces[0].chars().count() <= 10);
        assert!(pieces[1].chars().count() > 10);
    }

    #[test]
    fn empty_header_leaves_subpieces_alone() {
        let piece = "z".repeat(30);
        assert_eq!(
            enforce_size_limit_with_header(&piece, "", 10),
            enforce_size_limit(&piece, 10)
        );
    }

    #[test]
    fn single_subpiece_never_prepended() {
        let pieces = enforce_size_limit_with_header("short", "HDR", 100);
        assert_eq!(pieces, vec!["short"]);
    }

    #[test]
    fn limit_measured_in_chars() {
        let piece = "é".repeat(15);
        let pieces = enforce_size_limit(&piece, 10);

        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].chars().count(), 10);
        assert_eq!(pieces[1].chars().count(), 5);
    }

    #[test]
    #[should_panic(expected = "size limit must be greater than zero")]
    fn zero_limit_panics() {
        enforce_size_limit("text", 0);
    }
}
