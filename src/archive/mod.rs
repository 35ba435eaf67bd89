// src/archive/mod.rs
use crate::extractors::{Document, DocumentKind};
use crate::utils::error::ArchiveError;
use std::io::Read;
use std::path::Path;

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOCATION: usize = 64 << 20;

/// Buffer capacity for an entry whose header claims `declared` bytes.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOCATION, |size| size.min(MAX_PREALLOCATION))
}

/// Reads every supported document out of a ZIP archive.
///
/// Documents come back sorted by file name so report order does not depend on
/// how the archive was built. Directories, macOS resource forks, hidden files
/// and unsupported extensions are skipped.
pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<Vec<Document>, ArchiveError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    tracing::info!("Reading {} entries from {}", archive.len(), path.display());

    let mut documents = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let entry_name = entry.name().to_string();
        if entry_name.starts_with("__MACOSX/") {
            continue;
        }

        let name = match entry_name.rsplit('/').next() {
            Some(name) if !name.is_empty() && !name.starts_with('.') => name.to_string(),
            _ => {
                tracing::debug!("Skipping hidden entry {}", entry_name);
                continue;
            }
        };

        let Some(kind) = DocumentKind::from_name(&name) else {
            tracing::debug!("Skipping unsupported entry {}", entry_name);
            continue;
        };

        let mut bytes = Vec::with_capacity(capacity_hint(entry.size()));
        entry.read_to_end(&mut bytes)?;
        documents.push(Document { name, kind, bytes });
    }

    // Stable sort: entries sharing a name keep archive order.
    documents.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!("Found {} supported documents", documents.len());
    Ok(documents)
}
