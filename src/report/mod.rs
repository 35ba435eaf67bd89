pub mod assembler;
pub mod blocks;
pub mod docx;
pub mod renderer;
pub mod template;

pub use assembler::{assemble, DocumentSection, Report, QUESTION_LEVEL};
pub use renderer::render;
