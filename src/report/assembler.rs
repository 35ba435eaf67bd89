// src/report/assembler.rs
use crate::profiles::ReportMeta;
use crate::report::blocks::RenderedBlock;

/// Heading level of the scope heading and of each document's profile heading.
pub const SECTION_LEVEL: usize = 1;
/// Heading level of top-level questions.
pub const QUESTION_LEVEL: usize = SECTION_LEVEL + 1;

/// Everything the report needs from one matched document.
#[derive(Debug, Clone)]
pub struct DocumentSection {
    pub document_name: String,
    pub profile_heading: String,
    pub found_message: String,
    pub blocks: Vec<RenderedBlock>,
}

/// The finished report, ready for a writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub blocks: Vec<RenderedBlock>,
}

/// Accumulates report blocks in processing order. The title and scope are
/// written once, up front.
pub struct ReportAssembler {
    title: String,
    blocks: Vec<RenderedBlock>,
}

impl ReportAssembler {
    pub fn new(meta: &ReportMeta) -> Self {
        let blocks = vec![
            RenderedBlock::heading(0, meta.title.as_str()),
            RenderedBlock::heading(SECTION_LEVEL, meta.scope_heading.as_str()),
            RenderedBlock::plain(meta.scope_body.as_str()),
        ];
        Self { title: meta.title.clone(), blocks }
    }

    pub fn add_document(&mut self, section: DocumentSection) {
        tracing::debug!(
            "Adding {} ({} blocks) under '{}'",
            section.document_name,
            section.blocks.len(),
            section.profile_heading
        );
        self.blocks.push(RenderedBlock::heading(SECTION_LEVEL, section.profile_heading));
        self.blocks.push(RenderedBlock::plain(format!("Source: {}", section.document_name)));
        if !section.found_message.is_empty() {
            self.blocks.push(RenderedBlock::bold(section.found_message));
        }
        self.blocks.extend(section.blocks);
        self.blocks.push(RenderedBlock::PageBreak);
    }

    pub fn finish(self) -> Report {
        Report { title: self.title, blocks: self.blocks }
    }
}

/// Builds a report in one go from already rendered sections.
pub fn assemble(meta: &ReportMeta, sections: Vec<DocumentSection>) -> Report {
    let mut assembler = ReportAssembler::new(meta);
    for section in sections {
        assembler.add_document(section);
    }
    assembler.finish()
}
