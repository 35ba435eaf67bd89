// src/extractors/text.rs

// --- Imports ---
use crate::extractors::pdf::{
    ExtractorSettings, LayoutStrategy, OcrStrategy, TesseractEngine, TextLayerStrategy,
};
use crate::extractors::word;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;

// Everything OCR may leave behind that is not a letter, digit, whitespace or plain punctuation.
static OCR_NOISE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^\p{Alphabetic}\p{N}\s*()\-,.:;?!'"]"#)
        .expect("Failed to compile OCR_NOISE_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
}

impl DocumentKind {
    /// Classifies a file name by extension (case-insensitive). `None` for anything unsupported.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Word),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
        }
    }
}

/// One input document, fully loaded into memory.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    TextLayer,
    Layout,
    Ocr,
    Word,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextLayer => "text_layer",
            Self::Layout => "layout",
            Self::Ocr => "ocr",
            Self::Word => "word",
        };
        f.write_str(name)
    }
}

/// Result of text extraction. Empty content means every strategy came up dry;
/// that is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    content: String,
    method: Option<ExtractionMethod>,
}

impl ExtractedText {
    pub fn new(content: String, method: ExtractionMethod) -> Self {
        Self { content, method: Some(method) }
    }

    pub fn empty() -> Self {
        Self { content: String::new(), method: None }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn method(&self) -> Option<ExtractionMethod> {
        self.method
    }

    /// True when there is no non-whitespace content.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

// --- Strategy seam ---

/// One way of getting text out of PDF bytes.
pub trait ExtractionStrategy: Send + Sync {
    fn method(&self) -> ExtractionMethod;

    fn extract(&self, pdf: &[u8]) -> Result<String, ExtractError>;

    /// Whether the output goes through [`clean_text`] before use.
    fn cleans_output(&self) -> bool {
        false
    }
}

// --- Main Extractor Structure ---
pub struct TextExtractor {
    pdf_chain: Vec<Box<dyn ExtractionStrategy>>,
}

impl TextExtractor {
    /// Builds an extractor over an explicit strategy chain, tried in order.
    pub fn new(pdf_chain: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { pdf_chain }
    }

    /// Text layer, then layout-aware parsing, then OCR (unless disabled).
    pub fn from_settings(settings: &ExtractorSettings) -> Self {
        let mut chain: Vec<Box<dyn ExtractionStrategy>> = vec![
            Box::new(TextLayerStrategy::new(settings.pdftotext.clone())),
            Box::new(LayoutStrategy),
        ];
        if settings.ocr_enabled {
            let engine = TesseractEngine::new(settings.clone());
            chain.push(Box::new(OcrStrategy::new(Box::new(engine))));
        } else {
            tracing::info!("OCR fallback disabled");
        }
        Self::new(chain)
    }

    /// Extracts the text of one document. Never fails: strategy errors are logged
    /// and the chain falls through, ending in empty text.
    pub fn extract(&self, doc: &Document) -> ExtractedText {
        match doc.kind {
            DocumentKind::Word => match word::read_paragraphs(&doc.bytes) {
                Ok(text) if !text.trim().is_empty() => {
                    ExtractedText::new(text, ExtractionMethod::Word)
                }
                Ok(_) => {
                    tracing::debug!("Word document {} has no paragraph text", doc.name);
                    ExtractedText::empty()
                }
                Err(e) => {
                    tracing::warn!("Failed to read Word document {}: {}", doc.name, e);
                    ExtractedText::empty()
                }
            },
            DocumentKind::Pdf => self.extract_pdf(doc),
        }
    }

    fn extract_pdf(&self, doc: &Document) -> ExtractedText {
        for strategy in &self.pdf_chain {
            let method = strategy.method();
            match strategy.extract(&doc.bytes) {
                Ok(raw) => {
                    let text = if strategy.cleans_output() { clean_text(&raw) } else { raw };
                    if !text.trim().is_empty() {
                        tracing::info!(
                            "Extracted {} chars from {} via {}",
                            text.len(),
                            doc.name,
                            method
                        );
                        return ExtractedText::new(text, method);
                    }
                    tracing::debug!("Strategy {} produced no text for {}", method, doc.name);
                }
                Err(e) => {
                    tracing::warn!("Strategy {} failed for {}: {}", method, doc.name, e);
                }
            }
        }
        ExtractedText::empty()
    }
}

/// Strips OCR artifacts line by line: keeps letters, digits, whitespace and
/// `* ( ) - , . : ; ? ! ' "`. Line breaks always survive, even around lines that
/// end up empty.
pub fn clean_text(text: &str) -> String {
    text.split('\n')
        .map(|line| OCR_NOISE_RE.replace_all(line, ""))
        .collect::<Vec<_>>()
        .join("\n")
}
