use regex::Regex;

use crate::core::model::{FunctionDescription, Language};
use crate::error::{CommentsmithError, Result};
use super::LanguageParser;

/// Splits a task description from the code snippet that follows it.
///
/// The first line that looks like code is the anchor: prose above it becomes
/// the record's `docstring`, the anchor line and everything after it becomes
/// `full_function_text`. Nothing else is filled in; the code still has to go
/// through its own language's parser.
pub struct PromptParser {
    anchor_regex: Regex,
}

impl PromptParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            anchor_regex: Regex::new(
                r"^\s*(@|(def|class|public|private|protected|func|function)\s|.*[{};].*|.*->.*|.*=>.*)",
            )
            .expect("Invalid prompt anchor regex"),
        })
    }

    /// Byte offset of the first line that looks like code
    fn find_anchor(&self, content: &str) -> Option<usize> {
        let mut offset = 0;
        for line in content.split_inclusive('\n') {
            let bare = line.trim_end_matches(['\n', '\r']);
            if self.anchor_regex.is_match(bare) {
                return Some(offset);
            }
            offset += line.len();
        }
        None
    }
}

impl LanguageParser for PromptParser {
    fn parse_content(&mut self, content: &str) -> Result<Vec<FunctionDescription>> {
        let anchor = self.find_anchor(content).ok_or(CommentsmithError::CodeNotFound)?;

        let (task, code) = content.split_at(anchor);

        Ok(vec![FunctionDescription {
            full_function_text: Some(code.trim().to_string()),
            docstring: Some(task.trim().to_string()),
            docstring_lines_length: None,
            ..Default::default()
        }])
    }

    fn language(&self) -> Language {
        Language::Prompt
    }
}
