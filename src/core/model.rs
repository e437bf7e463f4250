use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the detector knows about.
///
/// Declaration order matters: content detection breaks score ties by
/// taking the language that appears first here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    C,
    Cpp,
    #[serde(rename = "csharp")]
    CSharp,
    Go,
    Java,
    #[serde(rename = "javascript")]
    JavaScript,
    /// Task-description files: prose followed by a code snippet
    Prompt,
}

impl Language {
    /// All languages in enumeration order
    pub const ALL: [Language; 8] = [
        Language::Python,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Java,
        Language::JavaScript,
        Language::Prompt,
    ];

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Go => "go",
            Self::Java => "java",
            Self::JavaScript => "javascript",
            Self::Prompt => "prompt",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown language: {}", s))
    }
}

/// Uniform description of one function or method found by a parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescription {
    /// Language the function was parsed as (unset for prompt splits)
    pub language: Option<Language>,

    /// Declaration and body, including any attached doc comment
    pub full_function_text: Option<String>,

    /// Function text with the doc comment removed
    pub function_text: Option<String>,

    /// Attached documentation
    pub docstring: Option<String>,

    /// Number of lines in `full_function_text`
    pub full_function_lines_length: usize,

    /// Number of lines in `function_text`
    pub function_lines_length: usize,

    /// Number of lines the doc comment occupies; only meaningful with `docstring`
    pub docstring_lines_length: Option<usize>,

    pub name: Option<String>,

    /// `Outer.Inner.method` for methods, plain name otherwise
    pub qualified_name: Option<String>,

    /// Java package, C# namespace, ...
    pub namespace: Option<String>,

    pub signature_text: String,
    pub return_type: Option<String>,

    /// Parameter fragments in declaration order
    pub parameters: Vec<String>,

    /// 1-based inclusive line span, -1 when unknown
    pub start_line: i64,
    pub end_line: i64,

    pub is_method: bool,
    pub class_name: Option<String>,

    /// Doc comment of the enclosing type
    pub class_description: Option<String>,

    /// Python decorators / Java annotations
    pub decorators: Vec<String>,

    /// public/private/static/abstract/async/...
    pub modifiers: Vec<String>,
    pub visibility: Option<String>,

    /// False for prototypes, abstract and interface declarations
    pub has_body: bool,
    pub is_constructor: bool,
}

impl Default for FunctionDescription {
    fn default() -> Self {
        Self {
            language: None,
            full_function_text: None,
            function_text: None,
            docstring: None,
            full_function_lines_length: 0,
            function_lines_length: 0,
            docstring_lines_length: Some(0),
            name: None,
            qualified_name: None,
            namespace: None,
            signature_text: String::new(),
            return_type: None,
            parameters: Vec::new(),
            start_line: -1,
            end_line: -1,
            is_method: false,
            class_name: None,
            class_description: None,
            decorators: Vec::new(),
            modifiers: Vec::new(),
            visibility: None,
            has_body: true,
            is_constructor: false,
        }
    }
}

impl FunctionDescription {
    /// Name to show in listings, falling back through the available identifiers
    pub fn display_name(&self) -> &str {
        self.qualified_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("<anonymous>")
    }
}

impl fmt::Display for FunctionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or_default();
        let params = self.parameters.join(", ");
        match &self.return_type {
            Some(ret) => write!(f, "{} {}({})", ret, name, params),
            None => write!(f, "{}({})", name, params),
        }
    }
}

/// Count lines the way an editor would: a trailing newline does not open a new line
pub(crate) fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let newlines = text.matches('\n').count();
    if text.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_round_trips_through_name() {
        for lang in Language::ALL {
            assert_eq!(lang.name().parse::<Language>().unwrap(), lang);
            assert_eq!(lang.to_string(), lang.name());
        }
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_serializes_to_canonical_name() {
        let json = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(json, "\"csharp\"");
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
    }

    #[test]
    fn test_default_description_has_unknown_lines() {
        let fd = FunctionDescription::default();
        assert_eq!(fd.start_line, -1);
        assert_eq!(fd.end_line, -1);
        assert!(fd.has_body);
        assert!(fd.language.is_none());
    }

    #[test]
    fn test_display_signature() {
        let fd = FunctionDescription {
            name: Some("sum".to_string()),
            return_type: Some("int".to_string()),
            parameters: vec!["int a".to_string(), "int b".to_string()],
            ..Default::default()
        };
        assert_eq!(fd.to_string(), "int sum(int a, int b)");

        let fd = FunctionDescription {
            name: Some("run".to_string()),
            ..Default::default()
        };
        assert_eq!(fd.to_string(), "run()");
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("a"), 1);
        assert_eq!(count_lines("a\n"), 1);
        assert_eq!(count_lines("a\nb"), 2);
    }
}
