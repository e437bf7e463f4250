use thiserror::Error;

use crate::core::Language;

/// Main error type for Commentsmith operations
#[derive(Error, Debug)]
pub enum CommentsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("Unsupported language for file: {file}")]
    UnsupportedLanguage { file: String },

    #[error("Parser for language '{language}' is not implemented")]
    NotImplemented { language: Language },

    #[error("File {file} is {language}, not a prompt")]
    NotAPrompt { file: String, language: Language },

    #[error("Could not locate the start of code in the prompt")]
    CodeNotFound,

    #[error("Expected exactly one function, found {found}")]
    FunctionCount { found: usize },

    #[error("File {file} is {size} bytes, limit is {limit}")]
    InputTooLarge { file: String, size: usize, limit: usize },

    #[error("Comment backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CommentsmithError {
    /// Whether the input itself is at fault, as opposed to configuration or transport
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLanguage { .. }
                | Self::NotAPrompt { .. }
                | Self::CodeNotFound
                | Self::FunctionCount { .. }
                | Self::InputTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CommentsmithError>;
