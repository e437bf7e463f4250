//! Language-specific parsers for different programming languages
//!
//! Each language gets its own module with a consistent interface for turning
//! source text into [`FunctionDescription`] records.

mod java;
mod prompt;
mod python;

pub use java::JavaParser;
pub use prompt::PromptParser;
pub use python::PythonParser;

use crate::error::Result;
use super::model::{FunctionDescription, Language};

/// Trait that all language parsers must implement
pub trait LanguageParser: Send {
    /// Extract every function/method from `content`, in declaration order.
    ///
    /// Zero functions is a valid outcome. Malformed input yields an empty
    /// list rather than an error; the prompt splitter is the one parser
    /// with a defined failure case.
    fn parse_content(&mut self, content: &str) -> Result<Vec<FunctionDescription>>;

    /// The language this parser handles
    fn language(&self) -> Language;
}
