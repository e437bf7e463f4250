use crate::error::{CommentsmithError, Result};
use super::languages::{JavaParser, LanguageParser, PromptParser, PythonParser};
use super::model::Language;

type ParserConstructor = fn() -> Result<Box<dyn LanguageParser>>;

/// Languages that have a parser, and how to build one
const REGISTRY: &[(Language, ParserConstructor)] = &[
    (Language::Python, python_parser),
    (Language::Java, java_parser),
    (Language::Prompt, prompt_parser),
];

fn python_parser() -> Result<Box<dyn LanguageParser>> {
    Ok(Box::new(PythonParser::new()?))
}

fn java_parser() -> Result<Box<dyn LanguageParser>> {
    Ok(Box::new(JavaParser::new()?))
}

fn prompt_parser() -> Result<Box<dyn LanguageParser>> {
    Ok(Box::new(PromptParser::new()?))
}

/// Hands out parsers by language.
///
/// Every call builds a fresh parser, so callers never share parser state and
/// can parse from as many threads as they like.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParserFactory;

impl ParserFactory {
    pub fn new() -> Self {
        Self
    }

    /// Build a parser for `language`.
    ///
    /// Languages the detector recognises but nobody has written a parser for
    /// fail with [`CommentsmithError::NotImplemented`].
    pub fn get_parser(&self, language: Language) -> Result<Box<dyn LanguageParser>> {
        let (_, build) = REGISTRY
            .iter()
            .find(|(registered, _)| *registered == language)
            .ok_or(CommentsmithError::NotImplemented { language })?;
        build()
    }

    pub fn is_parseable(&self, language: Language) -> bool {
        REGISTRY.iter().any(|(registered, _)| *registered == language)
    }

    /// Languages with a registered parser, in enumeration order
    pub fn parseable_languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|lang| self.is_parseable(*lang))
            .collect()
    }
}
