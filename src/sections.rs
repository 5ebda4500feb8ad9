//! Markdown section splitting along heading lines.
//!
//! A heading line is one or more `#` markers followed by at least one space
//! and the heading text, optionally indented. Each section runs from its
//! heading line to the next heading line, so every piece starts with the
//! heading that names it.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(#+\s+.*)$").expect("valid regex"));

/// Split a markdown document into heading-delimited sections.
///
/// Text before the first heading becomes its own leading section when it is
/// non-blank. Every section is trimmed and blank sections are dropped. A
/// document without any heading yields the whole trimmed input as a single
/// section, or nothing when the input is blank.
///
/// # Examples
///
/// ```
/// use textvault::sections::split_by_sections;
///
/// let sections = split_by_sections("intro\n# One\nbody\n## Two\nmore");
/// assert_eq!(sections, vec!["intro", "# One\nbody", "## Two\nmore"]);
///
/// assert_eq!(split_by_sections("plain text"), vec!["plain text"]);
/// assert!(split_by_sections("").is_empty());
/// ```
pub fn split_by_sections(markdown: &str) -> Vec<String> {
    if markdown.trim().is_empty() {
        return Vec::new();
    }

    let starts: Vec<usize> =
        HEADING_LINE.find_iter(markdown).map(|m| m.start()).collect();

    if starts.is_empty() {
        return vec![markdown.trim().to_string()];
    }

    let mut sections = Vec::with_capacity(starts.len() + 1);

    let preamble = markdown[..starts[0]].trim();
    if !preamble.is_empty() {
        sections.push(preamble.to_string());
    }

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(markdown.len());
        let section = markdown[start..end].trim();
        if !section.is_empty() {
            sections.push(section.to_string());
        }
    }

    sections
}

/// Extract the first heading line found in a section, trimmed.
///
/// Returns an empty string when the section contains no heading line.
pub fn extract_section_heading(section: &str) -> String {
    HEADING_LINE
        .captures(section)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_sections() {
        assert!(split_by_sections("").is_empty());
    }

    #[test]
    fn blank_input_yields_no_sections() {
        assert!(split_by_sections("  \n\t\n").is_empty());
    }

    #[test]
    fn headingless_text_single_trimmed_section() {
        let sections = split_by_sections("  plain prose, no headings  \n");
        assert_eq!(sections, vec!["plain prose, no headings"]);
    }

    #[test]
    fn sections_start_at_their_heading() {
        let doc = "# First\nbody one\n\n## Second\nbody two\n";
        let sections = split_by_sections(doc);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0], "# First\nbody one");
        assert_eq!(sections[1], "## Second\nbody two");
    }

    #[test]
    fn preamble_kept_as_leading_section() {
        let doc = "before any heading\n\n# Title\ncontent";
        let sections = split_by_sections(doc);

        assert_eq!(sections[0], "before any heading");
        assert_eq!(sections[1], "# Title\ncontent");
    }

    #[test]
    fn blank_preamble_dropped() {
        let doc = "\n\n# Title\ncontent";
        let sections = split_by_sections(doc);
        assert_eq!(sections, vec!["# Title\ncontent"]);
    }

    #[test]
    fn indented_heading_recognized() {
        let doc = "  ## Indented\nbody";
        let sections = split_by_sections(doc);
        assert_eq!(sections, vec!["## Indented\nbody"]);
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        let doc = "#hashtag text without space";
        let sections = split_by_sections(doc);
        assert_eq!(sections, vec![doc]);
    }

    #[test]
    fn extract_heading_from_section() {
        assert_eq!(
            extract_section_heading("## Setup\nInstall the tool."),
            "## Setup"
        );
    }

    #[test]
    fn extract_heading_trims_indentation() {
        assert_eq!(extract_section_heading("   # Padded  \nbody"), "# Padded");
    }

    #[test]
    fn extract_heading_none_found() {
        assert_eq!(extract_section_heading("no heading here"), "");
        assert_eq!(extract_section_heading(""), "");
    }
}
