// src/main.rs
mod archive;
mod extractors;
mod pipeline;
mod profiles;
mod report;
mod storage;
mod utils;

use clap::Parser;
use extractors::{ExtractorSettings, TextExtractor};
use pipeline::{Pipeline, PipelineOptions};
use std::path::PathBuf;
use std::sync::Arc;
use storage::StorageManager;
use utils::AppError;

/// Command Line Interface for the document profile reporter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ZIP archive containing the PDF and .docx documents to process
    #[arg(short, long)]
    archive: PathBuf,

    /// Profile configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for the report and side files
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// File name of the generated report inside the output directory
    #[arg(short, long, default_value = "report.docx")]
    report_name: String,

    /// Save each document's extracted text and extraction metadata
    #[arg(long)]
    cache_text: bool,

    /// Debug mode - save annotated HTML of each document's text
    #[arg(short, long)]
    debug: bool,

    /// pdftotext executable used for the text-layer pass
    #[arg(long, default_value = "pdftotext")]
    pdftotext: String,

    /// pdfinfo executable used to count pages when lopdf cannot parse a file
    #[arg(long, default_value = "pdfinfo")]
    pdfinfo: String,

    /// pdftoppm executable used to rasterize pages for OCR
    #[arg(long, default_value = "pdftoppm")]
    pdftoppm: String,

    /// tesseract executable used for OCR
    #[arg(long, default_value = "tesseract")]
    tesseract: String,

    /// Tesseract language code
    #[arg(long, default_value = "eng")]
    ocr_lang: String,

    /// Rasterization resolution for OCR
    #[arg(long, default_value_t = 300)]
    ocr_dpi: u32,

    /// Skip the OCR fallback entirely
    #[arg(long)]
    no_ocr: bool,
}

impl Args {
    fn extractor_settings(&self) -> ExtractorSettings {
        ExtractorSettings {
            pdftotext: self.pdftotext.clone(),
            pdfinfo: self.pdfinfo.clone(),
            pdftoppm: self.pdftoppm.clone(),
            tesseract: self.tesseract.clone(),
            ocr_language: self.ocr_lang.clone(),
            ocr_dpi: self.ocr_dpi,
            ocr_enabled: !self.no_ocr,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Load profiles; a bad configuration stops the run before anything is written
    let config = profiles::load_config(&args.config)?;

    // 4. Read the input archive
    let documents = archive::read_archive(&args.archive)?;
    if documents.is_empty() {
        tracing::warn!(
            "No PDF or .docx documents in {}; writing title and scope only",
            args.archive.display()
        );
    }

    // 5. Initialize storage and the pipeline
    let storage = StorageManager::new(&args.output_dir)?;
    let extractor = TextExtractor::from_settings(&args.extractor_settings());
    let options = PipelineOptions { cache_text: args.cache_text, debug_html: args.debug };
    let pipeline = Pipeline::new(extractor, config.profiles)
        .with_side_outputs(storage.clone(), options);

    // 6. Process each document, in order
    let output = pipeline::run_batch(Arc::new(pipeline), documents).await;
    let summary = output.summary;

    tracing::info!(
        "Processed {}. Rendered: {}, No text: {}, No profile: {}, Failures: {}",
        summary.total(),
        summary.rendered,
        summary.no_text,
        summary.no_profile,
        summary.failed
    );

    // 7. Assemble and write the report
    let covered = output.sections.len();
    let report = report::assemble(&config.meta, output.sections);
    let path = storage.save_report(&report, &args.report_name)?;
    tracing::info!("Report with {} documents written to {}", covered, path.display());

    Ok(())
}
