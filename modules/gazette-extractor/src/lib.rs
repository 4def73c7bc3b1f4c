pub mod boilerplate;
pub mod extract;
pub mod hash;
pub mod language;

pub use extract::{extract, ExtractedContent};
pub use hash::content_hash;
pub use language::detect_language;
