//! Language detection by file extension and by content heuristics

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use regex::Regex;

use super::model::Language;

/// Extension table. `.h` is ambiguous between C and C++ and is treated as C.
const FILE_EXTENSIONS: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("c", Language::C),
    ("h", Language::C),
    ("cpp", Language::Cpp),
    ("cc", Language::Cpp),
    ("cxx", Language::Cpp),
    ("hpp", Language::Cpp),
    ("hh", Language::Cpp),
    ("hxx", Language::Cpp),
    ("cs", Language::CSharp),
    ("go", Language::Go),
    ("java", Language::Java),
    ("js", Language::JavaScript),
    ("mjs", Language::JavaScript),
    ("cjs", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("ts", Language::JavaScript),
    ("tsx", Language::JavaScript),
    ("prompt", Language::Prompt),
    ("txt", Language::Prompt),
];

/// Weighted content patterns, evaluated in multiline mode
const LANGUAGE_PATTERNS: &[(Language, &[(&str, u32)])] = &[
    (
        Language::Python,
        &[
            (r"^\s*def\s+\w+\(.*\):", 5),
            (r"^\s*class\s+\w+\(?.*\)?:", 3),
            (r"import\s+\w+", 1),
        ],
    ),
    (
        Language::Go,
        &[
            (r"^\s*func\s+\w+\(.*\)", 5),
            (r":=", 2),
            (r"\bpackage\s+\w+", 2),
        ],
    ),
    (
        Language::Java,
        &[
            (r"\b(public|private|protected)\s+[\w<>]+\s+\w+\s*\(", 5),
            (r"\bthrow new\b", 3),
            (r"\bnew\s+\w+\(", 2),
            (r"<[A-Z]>", 2),
        ],
    ),
    (
        Language::CSharp,
        &[
            (r"\busing\s+System\b", 4),
            (r"\bnamespace\s+\w+", 3),
            (r"\bConsole\.WriteLine\b", 3),
        ],
    ),
    (
        Language::JavaScript,
        &[
            (r"\bfunction\s+\w+\s*\(", 4),
            (r"\bconst\s+\w+\s*=", 2),
            (r"\bconsole\.log\b", 3),
            (r"=>", 2),
        ],
    ),
];

/// Maps filenames and code text to a [`Language`]
pub struct LanguageDetector {
    extensions: HashMap<&'static str, Language>,
    patterns: Vec<(Language, Vec<(Regex, u32)>)>,
}

impl LanguageDetector {
    pub fn new() -> Self {
        let extensions = FILE_EXTENSIONS.iter().copied().collect();

        let patterns = LANGUAGE_PATTERNS
            .iter()
            .map(|(lang, rules)| {
                let compiled = rules
                    .iter()
                    .map(|(pattern, weight)| {
                        let regex = Regex::new(&format!("(?m){}", pattern))
                            .expect("Invalid language pattern regex");
                        (regex, *weight)
                    })
                    .collect();
                (*lang, compiled)
            })
            .collect();

        Self { extensions, patterns }
    }

    /// Detect language from the file name's extension, case-insensitively
    pub fn detect_by_extension(&self, filename: &str) -> Option<Language> {
        let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
        self.extensions.get(ext.as_str()).copied()
    }

    /// Best-guess language for a piece of code.
    ///
    /// Each pattern adds its weight once, however often it matches. The highest
    /// total wins; ties go to the language declared first in [`Language`].
    /// Returns `None` when nothing scores.
    pub fn detect_by_content(&self, text: &str) -> Option<Language> {
        let scores = self.score(text);

        let mut best: Option<(Language, u32)> = None;
        for lang in Language::ALL {
            let score = scores.get(&lang).copied().unwrap_or(0);
            if score == 0 {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((lang, score)),
            }
        }

        best.map(|(lang, _)| lang)
    }

    /// Extension first, content as a fallback
    pub fn detect(&self, filename: &str, text: &str) -> Option<Language> {
        self.detect_by_extension(filename)
            .or_else(|| self.detect_by_content(text))
    }

    /// Per-language scores for `text`; languages without patterns are absent
    pub fn score(&self, text: &str) -> HashMap<Language, u32> {
        self.patterns
            .iter()
            .map(|(lang, rules)| {
                let total: u32 = rules
                    .iter()
                    .filter(|(regex, _)| regex.is_match(text))
                    .map(|(_, weight)| weight)
                    .sum();
                (*lang, total)
            })
            .collect()
    }

    /// Distinct languages reachable by extension, sorted by canonical name
    pub fn supported_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self
            .extensions
            .values()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        languages.sort_by_key(|lang| lang.name());
        languages
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}
