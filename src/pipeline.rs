// src/pipeline.rs
use crate::extractors::{Document, TextExtractor};
use crate::profiles::{match_profile, Profile};
use crate::report::{render, DocumentSection, QUESTION_LEVEL};
use crate::storage::StorageManager;
use crate::utils::html_debug;
use crate::utils::logging::timed;
use std::sync::Arc;

/// Optional side outputs written while processing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub cache_text: bool,
    pub debug_html: bool,
}

/// What happened to one document. Every variant except `Rendered` means the
/// document is left out of the report.
#[derive(Debug)]
pub enum DocumentOutcome {
    Rendered(DocumentSection),
    NoText,
    NoProfile,
    Failed(String),
}

impl DocumentOutcome {
    /// Stable event name for the logging channel.
    pub fn event(&self) -> &'static str {
        match self {
            Self::Rendered(_) => "rendered",
            Self::NoText => "no_text",
            Self::NoProfile => "no_profile",
            Self::Failed(_) => "document_error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rendered: usize,
    pub no_text: usize,
    pub no_profile: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &DocumentOutcome) {
        match outcome {
            DocumentOutcome::Rendered(_) => self.rendered += 1,
            DocumentOutcome::NoText => self.no_text += 1,
            DocumentOutcome::NoProfile => self.no_profile += 1,
            DocumentOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.rendered + self.no_text + self.no_profile + self.failed
    }
}

/// Result of a batch: the counts, and the rendered sections in processing order.
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub summary: BatchSummary,
    pub sections: Vec<DocumentSection>,
}

pub struct Pipeline {
    extractor: TextExtractor,
    profiles: Vec<Profile>,
    storage: Option<StorageManager>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(extractor: TextExtractor, profiles: Vec<Profile>) -> Self {
        Self { extractor, profiles, storage: None, options: PipelineOptions::default() }
    }

    /// Enables the side outputs in `options`, written under `storage`.
    pub fn with_side_outputs(
        mut self,
        storage: StorageManager,
        options: PipelineOptions,
    ) -> Self {
        self.storage = Some(storage);
        self.options = options;
        self
    }

    /// Extract, match and render one document.
    pub fn process(&self, doc: &Document) -> DocumentOutcome {
        let text = timed("extract", &doc.name, || self.extractor.extract(doc));
        self.write_side_outputs(doc, &text);

        if text.is_empty() {
            return DocumentOutcome::NoText;
        }

        let matched = timed("match", &doc.name, || match_profile(text.as_str(), &self.profiles));
        let Some(profile) = matched else {
            return DocumentOutcome::NoProfile;
        };
        tracing::info!("{} matched profile '{}'", doc.name, profile.heading);

        let blocks = timed("render", &doc.name, || {
            render(text.as_str(), &profile.questions, QUESTION_LEVEL)
        });

        DocumentOutcome::Rendered(DocumentSection {
            document_name: doc.name.clone(),
            profile_heading: profile.heading.clone(),
            found_message: profile.found_message.clone(),
            blocks,
        })
    }

    fn write_side_outputs(&self, doc: &Document, text: &crate::extractors::ExtractedText) {
        let Some(storage) = &self.storage else {
            return;
        };

        if self.options.cache_text {
            if let Err(e) = storage.save_extracted_text(doc, text) {
                tracing::error!("Failed to cache text for {}: {}", doc.name, e);
            }
            if let Err(e) = storage.save_extraction_metadata(doc, text) {
                tracing::error!(
                    "Failed to save extraction metadata for {}: {}",
                    doc.name,
                    e
                );
            }
        }

        if self.options.debug_html && !text.is_empty() {
            let written = storage.debug_path(doc).and_then(|path| {
                html_debug::create_debug_html(text.as_str(), &path, &self.profiles)
            });
            if let Err(e) = written {
                tracing::warn!("Failed to create debug HTML for {}: {}", doc.name, e);
            }
        }
    }
}

/// Processes documents one at a time, in order, collecting each rendered section.
/// Each document runs on the blocking pool so a panic inside a parser only costs
/// that document.
pub async fn run_batch(pipeline: Arc<Pipeline>, documents: Vec<Document>) -> BatchOutput {
    let mut output = BatchOutput::default();

    for doc in documents {
        let name = doc.name.clone();
        let worker = Arc::clone(&pipeline);

        let outcome = match tokio::task::spawn_blocking(move || worker.process(&doc)).await {
            Ok(outcome) => outcome,
            Err(e) => DocumentOutcome::Failed(format!("processing aborted: {}", e)),
        };

        output.summary.record(&outcome);
        let event = outcome.event();
        match outcome {
            DocumentOutcome::Rendered(section) => {
                tracing::info!(event, document = %name, "Document rendered into report");
                output.sections.push(section);
            }
            DocumentOutcome::NoText => {
                tracing::warn!(event, document = %name, "No text could be extracted; skipping");
            }
            DocumentOutcome::NoProfile => {
                tracing::warn!(event, document = %name, "No profile identifier found; skipping");
            }
            DocumentOutcome::Failed(reason) => {
                tracing::error!(event, document = %name, "Document failed: {}", reason);
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::text::ExtractionStrategy;
    use crate::extractors::text::ExtractionMethod;
    use crate::extractors::DocumentKind;
    use crate::profiles::{parse_config, ReportMeta};
    use crate::report::assemble;
    use crate::report::blocks::RenderedBlock;
    use crate::utils::error::ExtractError;

    /// Treats the "PDF" bytes as the text layer; panics on a poison marker.
    struct BytesAsText;

    impl ExtractionStrategy for BytesAsText {
        fn method(&self) -> ExtractionMethod {
            ExtractionMethod::TextLayer
        }

        fn extract(&self, pdf: &[u8]) -> Result<String, ExtractError> {
            let text = String::from_utf8_lossy(pdf).into_owned();
            if text.contains("POISON") {
                panic!("parser blew up");
            }
            Ok(text.trim().to_string())
        }
    }

    const CONFIG: &str = r#"{
        "general": { "title": "Contract Review", "scope": [{ "heading": "Scope", "body": "Q3 suppliers." }] },
        "docs": [{
            "identifier": "ACME",
            "heading": "ACME agreement",
            "message_if_identifier_found": "ACME contract detected.",
            "questions": [{
                "question": "Terms",
                "search_pattern": "NET 30",
                "extract_text": true,
                "extract_pattern": ".*?(\\d+) days",
                "message_template": "Payment due in {extracted_text_1} days",
                "message_if_not_found": "No terms."
            }]
        }]
    }"#;

    fn pdf(name: &str, text: &str) -> Document {
        Document { name: name.to_string(), kind: DocumentKind::Pdf, bytes: text.as_bytes().to_vec() }
    }

    fn pipeline() -> (Pipeline, ReportMeta) {
        let config = parse_config(CONFIG).unwrap();
        let extractor = TextExtractor::new(vec![Box::new(BytesAsText)]);
        (Pipeline::new(extractor, config.profiles), config.meta)
    }

    #[test]
    fn test_process_outcomes() {
        let (pipeline, _) = pipeline();

        match pipeline.process(&pdf("a.pdf", "ACME Corp ... NET 30 payment due in 30 days")) {
            DocumentOutcome::Rendered(section) => {
                assert_eq!(section.profile_heading, "ACME agreement");
                assert_eq!(
                    section.blocks,
                    vec![RenderedBlock::heading(2, "Terms"), RenderedBlock::italic("Payment due in 30 days")]
                );
            }
            other => panic!("Expected Rendered, got {:?}", other),
        }

        let no_text = pipeline.process(&pdf("blank.pdf", "   "));
        assert_eq!(no_text.event(), "no_text");
        let no_profile = pipeline.process(&pdf("other.pdf", "Globex invoice"));
        assert_eq!(no_profile.event(), "no_profile");
    }

    #[test]
    fn test_batch_skips_unmatched_and_survives_failures() {
        let (pipeline, meta) = pipeline();
        let documents = vec![
            pdf("1.pdf", "ACME ... NET 30, due in 30 days"),
            pdf("2.pdf", "POISON"),
            pdf("3.pdf", "Globex"),
            pdf("4.pdf", ""),
            pdf("5.pdf", "ACME without terms"),
        ];

        let output = tokio_test::block_on(run_batch(Arc::new(pipeline), documents));

        assert_eq!(output.summary, BatchSummary { rendered: 2, no_text: 1, no_profile: 1, failed: 1 });
        assert_eq!(output.summary.total(), 5);
        let names: Vec<_> = output.sections.iter().map(|s| s.document_name.as_str()).collect();
        assert_eq!(names, vec!["1.pdf", "5.pdf"]);

        let report = assemble(&meta, output.sections);
        let page_breaks = report.blocks.iter().filter(|b| **b == RenderedBlock::PageBreak).count();
        assert_eq!(page_breaks, 2, "Only matched documents contribute sections");
        assert!(report.blocks.contains(&RenderedBlock::italic("Payment due in 30 days")));
        assert!(report.blocks.contains(&RenderedBlock::plain("No terms.")));
    }

    #[test]
    fn test_outcome_events_are_stable() {
        assert_eq!(DocumentOutcome::NoText.event(), "no_text");
        assert_eq!(DocumentOutcome::NoProfile.event(), "no_profile");
        assert_eq!(DocumentOutcome::Failed("x".to_string()).event(), "document_error");
    }

    #[test]
    fn test_empty_archive_still_writes_title_and_scope_report() {
        let (pipeline, meta) = pipeline();
        let output = tokio_test::block_on(run_batch(Arc::new(pipeline), Vec::new()));
        assert_eq!(output.summary.total(), 0);

        let report = assemble(&meta, output.sections);
        assert_eq!(report.blocks.len(), 3);

        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let path = storage.save_report(&report, "report.docx").unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_side_outputs_written() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let (pipeline, _) = pipeline();
        let pipeline = pipeline.with_side_outputs(storage, PipelineOptions { cache_text: true, debug_html: true });

        pipeline.process(&pdf("a.pdf", "ACME NET 30"));
        assert!(dir.path().join("extracted/a.pdf.txt").is_file());
        assert!(dir.path().join("extracted/a.pdf.meta.json").is_file());
        assert!(dir.path().join("debug/a.pdf.html").is_file());
    }
}
