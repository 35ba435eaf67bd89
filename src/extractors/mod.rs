pub mod pdf;
pub mod text;
pub mod word;

// Re-export key extraction types for convenience
pub use pdf::ExtractorSettings;
pub use text::{
    Document,
    DocumentKind,
    ExtractedText,
    TextExtractor,
};
