//! Markdown heading-tree parsing with ancestor context.
//!
//! Where [`crate::sections`] keeps sections flat, this parser records each
//! heading's position in the document's heading tree: its nearest ancestor
//! and the full root-to-node chain of heading titles. The renderer turns
//! each node into a TITLE/HIERARCHY/CONTENT block so a chunk keeps its
//! place in the document even after it is embedded in isolation.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(#+)\s+(.*)$").expect("valid regex")
});

/// Separator between heading titles in a hierarchy path.
const PATH_SEPARATOR: &str = " > ";

/// One heading-delimited section with its ancestry resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownNode {
    /// Heading title with the `#` markers stripped.
    pub heading: String,
    /// Heading depth (number of `#` markers), 1-based.
    pub level: usize,
    /// The literal marker prefix, e.g. `"##"`.
    pub marker: String,
    /// Text between this heading line and the next heading line (or end of
    /// document), trimmed of surrounding whitespace. Empty when the heading
    /// has no body of its own.
    pub content: String,
    /// Nearest ancestor's heading title, or empty for a top-level node.
    pub parent_heading: String,
    /// Nearest ancestor's level, or zero for a top-level node.
    pub parent_level: usize,
    /// Nearest ancestor's marker, or empty for a top-level node.
    pub parent_marker: String,
    /// Root-to-node chain of heading titles joined by `" > "`; always ends
    /// with this node's own heading.
    pub hierarchy: String,
}

struct Ancestor {
    heading: String,
    level: usize,
    marker: String,
}

fn hierarchy_path(ancestors: &[Ancestor], heading: &str) -> String {
    let mut parts: Vec<&str> =
        ancestors.iter().map(|a| a.heading.as_str()).collect();
    parts.push(heading);
    parts.join(PATH_SEPARATOR)
}

/// Parse a markdown document into an ordered sequence of [`MarkdownNode`].
///
/// A single left-to-right pass maintains a stack of open ancestors: before a
/// new heading is emitted, every entry at the same or deeper level is popped,
/// so a level skip (`#` directly followed by `###`) still parents the deep
/// node to the nearest shallower heading. A document without headings yields
/// no nodes.
///
/// # Examples
///
/// ```
/// use textvault::hierarchy::parse_hierarchy;
///
/// let nodes = parse_hierarchy("# Guide\nintro\n## Setup\nsteps\n");
/// assert_eq!(nodes.len(), 2);
/// assert_eq!(nodes[1].hierarchy, "Guide > Setup");
/// assert_eq!(nodes[1].parent_heading, "Guide");
/// ```
pub fn parse_hierarchy(markdown: &str) -> Vec<MarkdownNode> {
    // (heading span end, content end, marker, heading) per heading line.
    let headings: Vec<(usize, usize, &str, &str)> = {
        let caps: Vec<regex::Captures<'_>> =
            HEADING_PARTS.captures_iter(markdown).collect();
        caps.iter()
            .enumerate()
            .map(|(i, c)| {
                let whole = c.get(0).expect("match");
                let content_end = caps
                    .get(i + 1)
                    .and_then(|next| next.get(0))
                    .map(|m| m.start())
                    .unwrap_or(markdown.len());
                (
                    whole.end(),
                    content_end,
                    c.get(1).expect("marker").as_str(),
                    c.get(2).expect("title").as_str(),
                )
            })
            .collect()
    };

    let mut nodes = Vec::with_capacity(headings.len());
    let mut stack: Vec<Ancestor> = Vec::new();

    for (heading_end, content_end, marker, title) in headings {
        let heading = title.trim().to_string();
        let level = marker.len();
        let content = markdown[heading_end..content_end].trim().to_string();

        // Entries at the same or deeper level are finished sections, not
        // ancestors of this node.
        while stack.last().is_some_and(|top| top.level >= level) {
            stack.pop();
        }

        let (parent_heading, parent_level, parent_marker) = match stack.last()
        {
            Some(parent) => {
                (parent.heading.clone(), parent.level, parent.marker.clone())
            }
            None => (String::new(), 0, String::new()),
        };

        let hierarchy = hierarchy_path(&stack, &heading);

        stack.push(Ancestor {
            heading: heading.clone(),
            level,
            marker: marker.to_string(),
        });

        nodes.push(MarkdownNode {
            heading,
            level,
            marker: marker.to_string(),
            content,
            parent_heading,
            parent_level,
            parent_marker,
            hierarchy,
        });
    }

    nodes
}

/// Parse a markdown document and render each node as a three-line block:
///
/// ```text
/// TITLE: ## Setup
/// HIERARCHY: Guide > Setup
/// CONTENT: steps
/// ```
///
/// Content keeps its internal newlines after the single `CONTENT:` label.
/// Returns an empty sequence when the document has no headings.
pub fn render_with_hierarchy(markdown: &str) -> Vec<String> {
    parse_hierarchy(markdown)
        .into_iter()
        .map(|node| {
            format!(
                "TITLE: {} {}\nHIERARCHY: {}\nCONTENT: {}",
                node.marker, node.heading, node.hierarchy, node.content
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_LEVELS: &str = "# Chapter 1\nChapter content.\n\n## Section 1.1\nSection content.\n\n### Subsection 1.1.1\nSubsection content.\n";

    #[test]
    fn empty_markdown_yields_no_nodes() {
        assert!(parse_hierarchy("").is_empty());
    }

    #[test]
    fn headingless_text_yields_no_nodes() {
        assert!(parse_hierarchy("just plain text with no headings").is_empty());
    }

    #[test]
    fn two_level_hierarchy() {
        let nodes = parse_hierarchy(
            "# Main Title\nContent under main title.\n\n## Subsection\nContent under subsection.",
        );

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].heading, "Main Title");
        assert_eq!(nodes[0].level, 1);
        assert_eq!(nodes[0].marker, "#");
        assert!(nodes[0].content.contains("Content under main title"));
        assert_eq!(nodes[0].parent_heading, "");
        assert_eq!(nodes[0].parent_level, 0);

        assert_eq!(nodes[1].heading, "Subsection");
        assert_eq!(nodes[1].level, 2);
        assert_eq!(nodes[1].parent_heading, "Main Title");
        assert_eq!(nodes[1].parent_marker, "#");
    }

    #[test]
    fn three_level_hierarchy_path() {
        let nodes = parse_hierarchy(THREE_LEVELS);

        assert_eq!(nodes.len(), 3);
        assert_eq!(
            nodes[2].hierarchy,
            "Chapter 1 > Section 1.1 > Subsection 1.1.1"
        );
        assert_eq!(nodes[2].parent_heading, "Section 1.1");
        assert_eq!(nodes[2].parent_level, 2);
    }

    #[test]
    fn hierarchy_ends_with_own_heading() {
        for node in parse_hierarchy(THREE_LEVELS) {
            assert!(node.hierarchy.ends_with(&node.heading));
        }
    }

    #[test]
    fn top_level_hierarchy_is_own_heading() {
        let nodes = parse_hierarchy("# Solo\nBody.");
        assert_eq!(nodes[0].hierarchy, "Solo");
    }

    #[test]
    fn level_skip_parents_to_nearest_shallower() {
        let nodes =
            parse_hierarchy("# Top Level\nContent.\n\n### Deep Level\nSkipped level 2.");

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].level, 3);
        assert_eq!(nodes[1].parent_heading, "Top Level");
        assert_eq!(nodes[1].hierarchy, "Top Level > Deep Level");
    }

    #[test]
    fn siblings_share_parent_and_new_chapter_resets() {
        let nodes = parse_hierarchy(
            "# Chapter 1\nContent 1.\n\n## Section 1.1\nA.\n\n## Section 1.2\nB.\n\n# Chapter 2\nContent 2.",
        );

        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[1].parent_heading, "Chapter 1");
        assert_eq!(nodes[2].parent_heading, "Chapter 1");
        assert_eq!(nodes[2].hierarchy, "Chapter 1 > Section 1.2");
        assert_eq!(nodes[3].parent_heading, "");
        assert_eq!(nodes[3].hierarchy, "Chapter 2");
    }

    #[test]
    fn headings_without_body_have_empty_content() {
        let nodes = parse_hierarchy("# Header 1\n## Header 2\n### Header 3");

        assert_eq!(nodes.len(), 3);
        for node in &nodes {
            assert_eq!(node.content, "");
        }
    }

    #[test]
    fn render_three_line_format() {
        let chunks = render_with_hierarchy("# Main\nMain content.");

        assert_eq!(chunks.len(), 1);
        let lines: Vec<&str> = chunks[0].lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "TITLE: # Main");
        assert_eq!(lines[1], "HIERARCHY: Main");
        assert_eq!(lines[2], "CONTENT: Main content.");
    }

    #[test]
    fn render_prefixes_in_order() {
        let chunks = render_with_hierarchy(
            "# Book\nBook intro.\n\n## Chapter\nChapter intro.\n\n### Section\nSection content.\n\n#### Subsection\nSubsection content.",
        );

        assert_eq!(chunks.len(), 4);
        for chunk in &chunks {
            let lines: Vec<&str> = chunk.lines().collect();
            assert!(lines[0].starts_with("TITLE:"));
            assert!(lines[1].starts_with("HIERARCHY:"));
            assert!(lines[2].starts_with("CONTENT:"));
        }
        assert!(
            chunks[3].contains("HIERARCHY: Book > Chapter > Section > Subsection")
        );
    }

    #[test]
    fn render_keeps_multiline_content_under_single_label() {
        let chunks = render_with_hierarchy("# Top\nline one\nline two");

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].contains("CONTENT: line one\nline two"));
        assert_eq!(chunks[0].matches("CONTENT:").count(), 1);
    }

    #[test]
    fn render_empty_document_is_empty() {
        assert!(render_with_hierarchy("").is_empty());
        assert!(render_with_hierarchy("No headers here.").is_empty());
    }

    #[test]
    fn headings_with_special_characters() {
        let chunks = render_with_hierarchy(
            "# Introduction: Getting Started\nContent here.\n\n## Part 1.1 - The Beginning\nMore content.",
        );

        assert!(chunks[0].contains("TITLE: # Introduction: Getting Started"));
        assert!(chunks[1].contains("TITLE: ## Part 1.1 - The Beginning"));
    }
}
