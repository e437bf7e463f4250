use serde::{Deserialize, Serialize};

use crate::core::model::{FunctionDescription, Language};
use crate::error::Result;

/// Everything the comment service needs to write one comment
#[derive(Debug, Clone, Serialize)]
pub struct CommentRequest {
    /// What the user asked for, in prose
    pub task: String,

    /// The code snippet exactly as it appeared in the prompt
    pub code: String,

    /// The single function found in `code`, as the parser extracted it
    pub function: String,

    /// Language the snippet was detected as
    #[serde(skip)]
    pub language: Language,

    /// Full parse result for the function
    #[serde(skip)]
    pub description: FunctionDescription,
}

/// A generated comment together with the function it describes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment: String,
    pub function: String,
}

/// Trait for services that turn a [`CommentRequest`] into comment text
#[async_trait::async_trait]
pub trait CommentBackend: Send + Sync {
    /// Generate the comment; nothing is retried on failure
    async fn generate_comment(&self, request: &CommentRequest) -> Result<String>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &str;
}
