//! Commentsmith: pulls functions out of source files so comments can be written for them
//!
//! The [`Engine`] detects a file's language, hands it to the matching parser
//! and returns one [`FunctionDescription`] per function or method. Prompt files
//! (a task in prose followed by a code snippet) additionally feed a single
//! function to an external comment service.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub use crate::config::Config;
pub use crate::core::{Engine, FunctionDescription, Language, LanguageDetector, ParserFactory};
pub use crate::error::{CommentsmithError, Result};
