// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::{Document, ExtractedText};
use crate::report::{docx, Report};
use crate::utils::error::StorageError;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Creates (if needed) and returns a subdirectory of the base directory
    fn subdir(&self, name: &str) -> Result<PathBuf, StorageError> {
        let dir = self.base_dir.join(name);
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .map_err(StorageError::IoError)?;
        }
        Ok(dir)
    }

    /// Writes the assembled report as a .docx file
    pub fn save_report(&self, report: &Report, file_name: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(file_name);
        docx::write_docx(report, &file_path)?;

        tracing::info!("Saved report to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves the extracted text of a document for inspection
    pub fn save_extracted_text(
        &self,
        document: &Document,
        text: &ExtractedText,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.subdir("extracted")?.join(format!("{}.txt", document.name));

        let mut file = fs::File::create(&file_path)
            .map_err(StorageError::IoError)?;
        file.write_all(text.as_str().as_bytes())
            .map_err(StorageError::IoError)?;

        tracing::debug!("Saved extracted text to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves metadata about an extraction in JSON format
    pub fn save_extraction_metadata(
        &self,
        document: &Document,
        text: &ExtractedText,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.subdir("extracted")?.join(format!("{}.meta.json", document.name));

        // Create metadata structure
        let metadata = serde_json::json!({
            "document": document.name,
            "kind": document.kind.as_str(),
            "method": text.method().map(|m| m.to_string()),
            "characters": text.as_str().chars().count(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        // Write the metadata to the file
        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::debug!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }

    /// Path for a document's debug annotation, creating the debug directory
    pub fn debug_path(&self, document: &Document) -> Result<PathBuf, StorageError> {
        Ok(self.subdir("debug")?.join(format!("{}.html", document.name)))
    }
}
