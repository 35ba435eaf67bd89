// src/report/renderer.rs
use crate::profiles::{Extraction, QuestionNode, QuestionDef, MAX_QUESTION_DEPTH};
use crate::report::blocks::RenderedBlock;
use crate::report::template;

/// Shown when a node's search text is present but its extraction produced nothing usable.
pub const NO_MATCH_MESSAGE: &str = "No matching content found.";

/// Renders a question tree against document text, depth-first pre-order.
/// Top-level nodes get headings at `depth`, their children at `depth + 1`, and so on.
pub fn render(text: &str, nodes: &[QuestionNode], depth: usize) -> Vec<RenderedBlock> {
    let mut blocks = Vec::new();
    render_into(text, nodes, depth, 0, &mut blocks);
    blocks
}

fn render_into(
    text: &str,
    nodes: &[QuestionNode],
    depth: usize,
    nesting: usize,
    blocks: &mut Vec<RenderedBlock>,
) {
    for node in nodes {
        let def = node.def();
        blocks.push(RenderedBlock::heading(depth, def.label.as_str()));

        if text.contains(def.search_pattern.as_str()) {
            match &def.extraction {
                Some(extraction) => blocks.push(extract_block(text, def, extraction)),
                None => match &def.found_message {
                    Some(message) => blocks.push(RenderedBlock::plain(message.as_str())),
                    // No found message configured: fall back to the node's own text.
                    None if !def.not_found_message.is_empty() => {
                        blocks.push(RenderedBlock::plain(def.not_found_message.as_str()))
                    }
                    None => {}
                },
            }
        } else {
            tracing::trace!("'{}' not found for question '{}'", def.search_pattern, def.label);
            blocks.push(RenderedBlock::plain(def.not_found_message.as_str()));
        }

        if def.children.is_empty() {
            continue;
        }
        if nesting + 1 >= MAX_QUESTION_DEPTH {
            tracing::warn!(
                "Not descending below '{}': question tree is nested too deeply",
                def.label
            );
            continue;
        }
        render_into(text, &def.children, depth + 1, nesting + 1, blocks);
    }
}

fn extract_block(text: &str, def: &QuestionDef, extraction: &Extraction) -> RenderedBlock {
    let Some(caps) = extraction.pattern.captures(text) else {
        tracing::debug!(
            "Pattern '{}' found nothing for '{}'",
            extraction.pattern.as_str(),
            def.label
        );
        return RenderedBlock::intense_quote(NO_MATCH_MESSAGE);
    };

    let message = match &extraction.template {
        Some(tpl) => template::fill(tpl, &caps),
        // Without a template the whole match is the answer.
        None => Ok(caps[0].to_string()),
    };

    match message {
        Ok(message) => RenderedBlock::italic(message),
        Err(e) => {
            tracing::warn!("Template for '{}' could not be filled: {}", def.label, e);
            RenderedBlock::intense_quote(NO_MATCH_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::parse_config;

    fn questions(json_questions: &str) -> Vec<QuestionNode> {
        let json = format!(
            r#"{{ "general": {{ "title": "T", "scope": [{{ "heading": "S", "body": "" }}] }},
               "docs": [{{ "identifier": "ACME", "heading": "H", "questions": {} }}] }}"#,
            json_questions
        );
        parse_config(&json).expect("test config should parse").profiles.remove(0).questions
    }

    const TERMS: &str = r#"[{
        "question": "Terms",
        "search_pattern": "NET 30",
        "extract_text": true,
        "extract_pattern": ".*?(\\d+) days",
        "message_template": "Payment due in {extracted_text_1} days",
        "message_if_not_found": "Payment terms not stated."
    }]"#;

    #[test]
    fn test_extracts_and_fills_template() {
        let blocks = render("... ACME Corp ... NET 30 payment due in 30 days ...", &questions(TERMS), 2);
        assert_eq!(
            blocks,
            vec![RenderedBlock::heading(2, "Terms"), RenderedBlock::italic("Payment due in 30 days")]
        );
    }

    #[test]
    fn test_missing_search_text_uses_not_found_message() {
        let blocks = render("ACME Corp, payment on receipt", &questions(TERMS), 2);
        assert_eq!(
            blocks,
            vec![RenderedBlock::heading(2, "Terms"), RenderedBlock::plain("Payment terms not stated.")]
        );
    }

    #[test]
    fn test_extract_pattern_continues_search_pattern() {
        // "NET 30" + "(\d+) days" needs digits right after "NET 30", so a later
        // "30 days" elsewhere in the text does not count.
        let nodes = questions(
            r#"[{ "question": "Terms", "search_pattern": "NET 30", "extract_text": true,
                 "extract_pattern": "(\\d+) days", "message_template": "Payment due in {extracted_text_1} days" }]"#,
        );
        let blocks = render("ACME Corp ... NET 30 payment due in 30 days", &nodes, 2);
        assert_eq!(blocks[1], RenderedBlock::intense_quote(NO_MATCH_MESSAGE));

        let blocks = render("ACME Corp ... NET 3045 days", &nodes, 2);
        assert_eq!(blocks[1], RenderedBlock::italic("Payment due in 45 days"));
    }

    #[test]
    fn test_match_is_case_insensitive_and_spans_lines() {
        let nodes = questions(
            r#"[{ "question": "Total", "search_pattern": "Total", "extract_text": true,
                 "extract_pattern": ".*?amount:\\s*(\\S+)", "message_template": "{extracted_text_1}" }]"#,
        );
        // Substring check is literal ("Total"), regex is case-insensitive: first match is "TOTAL".
        let blocks = render("TOTAL\nAmount: 100\nTotal\namount: 200", &nodes, 1);
        assert_eq!(blocks[1], RenderedBlock::italic("100"));
    }

    #[test]
    fn test_bad_template_only_affects_its_node() {
        let nodes = questions(
            r#"[
                { "question": "Broken", "search_pattern": "ACME", "extract_text": true,
                  "extract_pattern": "\\s+(\\w+)", "message_template": "{extracted_text_1} {extracted_text_2}" },
                { "question": "Next", "search_pattern": "missing", "message_if_not_found": "Still rendered." }
            ]"#,
        );
        let blocks = render("ACME Corp", &nodes, 2);
        assert_eq!(
            blocks,
            vec![
                RenderedBlock::heading(2, "Broken"),
                RenderedBlock::intense_quote(NO_MATCH_MESSAGE),
                RenderedBlock::heading(2, "Next"),
                RenderedBlock::plain("Still rendered."),
            ]
        );
    }

    #[test]
    fn test_found_without_extraction_falls_back_to_configured_text() {
        let nodes = questions(
            r#"[{ "question": "Signed", "search_pattern": "Signature", "message_if_not_found": "Unsigned." }]"#,
        );
        let blocks = render("ACME Signature", &nodes, 2);
        assert_eq!(
            blocks,
            vec![RenderedBlock::heading(2, "Signed"), RenderedBlock::plain("Unsigned.")]
        );
    }

    #[test]
    fn test_found_message_wins_over_fallback() {
        let nodes = questions(
            r#"[
                { "address": "Office", "search_pattern": "Suite", "message_if_found": "Office address present.",
                  "message_if_not_found": "No office." },
                { "question": "Bare", "search_pattern": "Suite" }
            ]"#,
        );
        let blocks = render("Signature ... Suite 100", &nodes, 2);
        assert_eq!(
            blocks,
            vec![
                RenderedBlock::heading(2, "Office"),
                RenderedBlock::plain("Office address present."),
                RenderedBlock::heading(2, "Bare"),
            ]
        );
    }

    #[test]
    fn test_no_template_emits_whole_match() {
        let nodes = questions(
            r#"[{ "question": "Ref", "search_pattern": "Ref", "extract_text": true, "extract_pattern": "[:#]\\s*\\d+" }]"#,
        );
        let blocks = render("Ref# 123", &nodes, 2);
        assert_eq!(blocks[1], RenderedBlock::italic("Ref# 123"));
    }

    #[test]
    fn test_three_levels_render_pre_order() {
        let nodes = questions(
            r#"[
                { "question": "A", "search_pattern": "a", "message_if_not_found": "no a",
                  "questions": [
                    { "question": "A1", "search_pattern": "zzz", "message_if_not_found": "no A1",
                      "questions": [
                        { "question": "A1x", "search_pattern": "a", "extract_text": true,
                          "extract_pattern": "qqq(\\d)", "message_if_not_found": "n/a" },
                        { "question": "A1y", "search_pattern": "a" }
                      ] },
                    { "question": "A2", "search_pattern": "a" }
                  ] },
                { "question": "B", "search_pattern": "zzz", "message_if_not_found": "no B" }
            ]"#,
        );
        let blocks = render("a", &nodes, 1);
        assert_eq!(
            blocks,
            vec![
                RenderedBlock::heading(1, "A"),
                RenderedBlock::plain("no a"),
                RenderedBlock::heading(2, "A1"),
                RenderedBlock::plain("no A1"),
                RenderedBlock::heading(3, "A1x"),
                RenderedBlock::intense_quote(NO_MATCH_MESSAGE),
                RenderedBlock::heading(3, "A1y"),
                RenderedBlock::heading(2, "A2"),
                RenderedBlock::heading(1, "B"),
                RenderedBlock::plain("no B"),
            ]
        );
    }
}
