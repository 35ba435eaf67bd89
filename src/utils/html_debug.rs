use std::fs::File;
use std::io::Write;
use std::path::Path;
use quick_xml::escape::escape;
use crate::profiles::{Profile, QuestionNode};
use crate::utils::error::StorageError;

/// What a highlighted span stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    Identifier,
    Found,
}

impl HighlightKind {
    fn css_class(&self) -> &'static str {
        match self {
            Self::Identifier => "highlight-identifier",
            Self::Found => "highlight-found",
        }
    }
}

/// Builds an HTML view of extracted text with the given byte spans highlighted.
/// Spans overlapping an earlier one are dropped.
pub fn annotate(text: &str, highlights: &[(usize, usize, HighlightKind)]) -> String {
    let mut debug_html =
        String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str("body { white-space: pre-wrap; font-family: monospace; }\n");
    debug_html.push_str(".highlight-identifier { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-found { background-color: #FFFF00; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0); // Sort by position

    for (start, end, kind) in sorted_highlights {
        if start < last_pos {
            continue;
        }

        // Add content before the highlight
        debug_html.push_str(&escape(&text[last_pos..start]));

        debug_html.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}\">",
            kind.css_class(),
            start,
            end
        ));
        debug_html.push_str(&escape(&text[start..end]));
        debug_html.push_str("</span>");

        last_pos = end;
    }

    // Add any remaining content
    debug_html.push_str(&escape(&text[last_pos..]));

    debug_html.push_str("\n</body>\n</html>");
    debug_html
}

/// Every occurrence of each profile identifier and question search text in `text`.
pub fn profile_highlights(text: &str, profiles: &[Profile]) -> Vec<(usize, usize, HighlightKind)> {
    fn collect_nodes(
        text: &str,
        nodes: &[QuestionNode],
        out: &mut Vec<(usize, usize, HighlightKind)>,
    ) {
        for node in nodes {
            let def = node.def();
            push_occurrences(text, &def.search_pattern, HighlightKind::Found, out);
            collect_nodes(text, &def.children, out);
        }
    }

    let mut highlights = Vec::new();
    for profile in profiles {
        push_occurrences(text, &profile.identifier, HighlightKind::Identifier, &mut highlights);
        collect_nodes(text, &profile.questions, &mut highlights);
    }
    highlights
}

fn push_occurrences(
    text: &str,
    needle: &str,
    kind: HighlightKind,
    out: &mut Vec<(usize, usize, HighlightKind)>,
) {
    if needle.is_empty() {
        return;
    }
    out.extend(text.match_indices(needle).map(|(start, m)| (start, start + m.len(), kind)));
}

/// Writes the annotated HTML for a document's text
pub fn create_debug_html(
    text: &str,
    path: &Path,
    profiles: &[Profile],
) -> Result<(), StorageError> {
    let highlights = profile_highlights(text, profiles);
    let mut file = File::create(path)?;
    file.write_all(annotate(text, &highlights).as_bytes())?;

    tracing::info!("Saved debug HTML to {}", path.display());
    Ok(())
}
