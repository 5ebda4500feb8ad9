//! Fixed-window chunking for splitting long text into overlapping segments.
//!
//! Windows are measured in Unicode scalar values (chars), not bytes, so a
//! window boundary never lands inside a multi-byte UTF-8 sequence. The same
//! unit is used everywhere a size limit is compared (see [`crate::subdivide`]).

/// Split text into fixed-size windows with the given overlap.
///
/// Windows start at positions `0, step, 2*step, ...` where
/// `step = window - overlap`; every window has exactly `window` chars except
/// possibly the last, which is truncated to the remaining length. Empty input
/// produces no windows.
///
/// Callers must ensure `overlap < window`; a non-positive step would never
/// advance, so the contract violation is rejected up front instead of
/// looping forever.
///
/// # Panics
///
/// Panics if `window == 0` or `overlap >= window`.
///
/// # Examples
///
/// ```
/// use textvault::chunking::chunk_text;
///
/// let chunks = chunk_text("abcdefgh", 4, 1);
/// assert_eq!(chunks, vec!["abcd", "defg", "gh"]);
///
/// assert!(chunk_text("", 4, 0).is_empty());
/// ```
pub fn chunk_text(text: &str, window: usize, overlap: usize) -> Vec<String> {
    assert!(window > 0, "window must be greater than zero");
    assert!(overlap < window, "overlap must be less than window");

    if text.is_empty() {
        return Vec::new();
    }

    // Map of char index -> byte index so window boundaries stay on char
    // boundaries. The final entry marks one past the last char.
    let char_to_byte: Vec<usize> = text
        .char_indices()
        .map(|(byte_idx, _)| byte_idx)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = char_to_byte.len() - 1;

    let step = window - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < char_count {
        let end = (start + window).min(char_count);
        chunks.push(text[char_to_byte[start]..char_to_byte[end]].to_string());
        start += step;
    }

    chunks
}
