// src/extractors/word.rs
use crate::utils::error::ExtractError;
use roxmltree::Node;
use std::io::{Cursor, Read};

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn is_w(node: &Node, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(WORDML_NS)
}

/// Reads the body paragraphs of a `.docx` package in document order, one per line.
/// Paragraphs nested in tables, headers or text boxes are not included.
pub fn read_paragraphs(docx: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx))
        .map_err(|e| ExtractError::Word(format!("not a .docx package: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Word(format!("missing word/document.xml: {}", e)))?
        .read_to_string(&mut xml)?;

    let doc = roxmltree::Document::parse(&xml)
        .map_err(|e| ExtractError::Word(format!("invalid document.xml: {}", e)))?;

    let body = doc
        .descendants()
        .find(|n| is_w(n, "body"))
        .ok_or_else(|| ExtractError::Word("document.xml has no body".to_string()))?;

    let paragraphs: Vec<String> = body
        .children()
        .filter(|n| is_w(n, "p"))
        .map(|p| paragraph_text(&p))
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Node) -> String {
    let mut text = String::new();
    for node in paragraph.descendants() {
        if is_w(&node, "t") {
            text.push_str(node.text().unwrap_or_default());
        } else if is_w(&node, "tab") {
            text.push('\t');
        } else if is_w(&node, "br") || is_w(&node, "cr") {
            text.push('\n');
        }
    }
    text
}
