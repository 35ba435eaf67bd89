// src/report/blocks.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Normal,
    IntenseQuote,
}

/// One unit of report output. Level 0 headings are the report title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBlock {
    Heading { level: usize, text: String },
    Paragraph { text: String, bold: bool, italic: bool, style: ParagraphStyle },
    PageBreak,
}

impl RenderedBlock {
    pub fn heading(level: usize, text: impl Into<String>) -> Self {
        Self::Heading { level, text: text.into() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            bold: false,
            italic: false,
            style: ParagraphStyle::Normal,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            bold: true,
            italic: false,
            style: ParagraphStyle::Normal,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            bold: false,
            italic: true,
            style: ParagraphStyle::Normal,
        }
    }

    pub fn intense_quote(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            bold: false,
            italic: false,
            style: ParagraphStyle::IntenseQuote,
        }
    }
}
