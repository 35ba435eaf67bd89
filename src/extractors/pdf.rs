// src/extractors/pdf.rs
use crate::extractors::text::{ExtractionMethod, ExtractionStrategy};
use crate::utils::error::ExtractError;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Tool locations and OCR knobs for the PDF strategies.
#[derive(Debug, Clone)]
pub struct ExtractorSettings {
    pub pdftotext: String,
    pub pdfinfo: String,
    pub pdftoppm: String,
    pub tesseract: String,
    pub ocr_language: String,
    pub ocr_dpi: u32,
    pub ocr_enabled: bool,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            pdftotext: "pdftotext".to_string(),
            pdfinfo: "pdfinfo".to_string(),
            pdftoppm: "pdftoppm".to_string(),
            tesseract: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            ocr_dpi: 300,
            ocr_enabled: true,
        }
    }
}

/// Writes the PDF bytes to a scratch file so external tools can read them.
fn scratch_pdf(pdf: &[u8]) -> Result<tempfile::NamedTempFile, ExtractError> {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
    file.write_all(pdf)?;
    file.flush()?;
    Ok(file)
}

/// Runs a tool to completion and returns its stdout, failing on a non-zero exit.
fn run_tool(command: &mut Command, tool: &str) -> Result<Vec<u8>, ExtractError> {
    let output = command.output().map_err(|source| ExtractError::ToolSpawn {
        tool: tool.to_string(),
        source,
    })?;
    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            tool: tool.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}

// --- Strategy 1: text layer via pdftotext ---

pub struct TextLayerStrategy {
    program: String,
}

impl TextLayerStrategy {
    pub fn new(program: String) -> Self {
        Self { program }
    }
}

impl ExtractionStrategy for TextLayerStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::TextLayer
    }

    fn extract(&self, pdf: &[u8]) -> Result<String, ExtractError> {
        let input = scratch_pdf(pdf)?;
        let stdout = run_tool(
            Command::new(&self.program).arg("-layout").arg(input.path()).arg("-"),
            &self.program,
        )?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

// --- Strategy 2: layout-aware parsing with lopdf, page by page ---

pub struct LayoutStrategy;

impl ExtractionStrategy for LayoutStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Layout
    }

    fn extract(&self, pdf: &[u8]) -> Result<String, ExtractError> {
        let doc = lopdf::Document::load_mem(pdf)?;
        let mut pages = Vec::new();

        // get_pages is keyed by page number, so iteration is in page order.
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) if !text.trim().is_empty() => pages.push(text),
                Ok(_) => tracing::trace!("Page {} has no text layer", page_number),
                Err(e) => tracing::debug!("lopdf could not read page {}: {}", page_number, e),
            }
        }

        Ok(pages.join("\n"))
    }
}

// --- Strategy 3: OCR ---

/// Rasterizes and recognizes individual PDF pages.
pub trait OcrEngine: Send + Sync {
    fn page_count(&self, pdf: &[u8]) -> Result<u32, ExtractError>;

    /// Recognizes one page, numbered from 1.
    fn recognize_page(&self, pdf: &[u8], page: u32) -> Result<String, ExtractError>;
}

pub struct OcrStrategy {
    engine: Box<dyn OcrEngine>,
}

impl OcrStrategy {
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self { engine }
    }
}

impl ExtractionStrategy for OcrStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Ocr
    }

    fn extract(&self, pdf: &[u8]) -> Result<String, ExtractError> {
        let total = self.engine.page_count(pdf)?;
        tracing::info!("Starting OCR over {} pages", total);

        let mut pages = Vec::with_capacity(total as usize);
        for page in 1..=total {
            match self.engine.recognize_page(pdf, page) {
                Ok(text) if !text.trim().is_empty() => pages.push(text),
                Ok(_) => tracing::debug!("OCR found no text on page {}", page),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        Ok(pages.join("\n"))
    }

    fn cleans_output(&self) -> bool {
        true
    }
}

/// `pdftoppm` for rasterizing, `tesseract` for recognition.
pub struct TesseractEngine {
    settings: ExtractorSettings,
}

impl TesseractEngine {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self { settings }
    }

    fn rasterize(&self, input: &Path, page: u32, out_prefix: &Path) -> Result<(), ExtractError> {
        let page_arg = page.to_string();
        let dpi_arg = self.settings.ocr_dpi.to_string();
        run_tool(
            Command::new(&self.settings.pdftoppm)
                .args(["-f", page_arg.as_str(), "-l", page_arg.as_str()])
                .args(["-r", dpi_arg.as_str()])
                .args(["-png", "-singlefile"])
                .arg(input)
                .arg(out_prefix),
            &self.settings.pdftoppm,
        )
        .map(|_| ())
    }

    /// Page count as reported by poppler, for files lopdf refuses to parse.
    fn pdfinfo_page_count(&self, pdf: &[u8]) -> Result<u32, ExtractError> {
        let input = scratch_pdf(pdf)?;
        let stdout = run_tool(
            Command::new(&self.settings.pdfinfo).arg(input.path()),
            &self.settings.pdfinfo,
        )?;
        parse_pdfinfo_pages(&String::from_utf8_lossy(&stdout))
            .ok_or_else(|| ExtractError::PageCount("pdfinfo printed no 'Pages:' line".to_string()))
    }
}

/// Reads the `Pages:` field out of `pdfinfo` output.
fn parse_pdfinfo_pages(output: &str) -> Option<u32> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|count| count.trim().parse().ok())
}

impl OcrEngine for TesseractEngine {
    fn page_count(&self, pdf: &[u8]) -> Result<u32, ExtractError> {
        match lopdf::Document::load_mem(pdf) {
            Ok(doc) => Ok(doc.get_pages().len() as u32),
            Err(e) => {
                tracing::debug!("lopdf could not count pages ({}), asking pdfinfo", e);
                self.pdfinfo_page_count(pdf)
            }
        }
    }

    fn recognize_page(&self, pdf: &[u8], page: u32) -> Result<String, ExtractError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("input.pdf");
        std::fs::write(&input, pdf)?;

        let prefix = scratch.path().join("page");
        self.rasterize(&input, page, &prefix)
            .map_err(|e| ExtractError::Ocr { page, message: e.to_string() })?;

        let image = prefix.with_extension("png");
        let stdout = run_tool(
            Command::new(&self.settings.tesseract)
                .arg(&image)
                .arg("stdout")
                .args(["-l", self.settings.ocr_language.as_str()]),
            &self.settings.tesseract,
        )
        .map_err(|e| ExtractError::Ocr { page, message: e.to_string() })?;

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
