mod detector;
mod engine;
mod languages;
mod llm;
mod model;
mod parser;

pub use detector::LanguageDetector;
pub use engine::{Engine, FileExtraction, FileReport};
pub use languages::{JavaParser, LanguageParser, PromptParser, PythonParser};
pub use llm::{
    create_backend, CommentBackend, CommentRequest, CommentResponse, HttpCommentBackend,
};
pub use model::{FunctionDescription, Language};
pub use parser::ParserFactory;
