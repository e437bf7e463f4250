use std::ops::Range;

use regex::{Captures, Regex};

use crate::core::model::{count_lines, FunctionDescription, Language};
use crate::error::Result;
use super::LanguageParser;

/// A single `/** ... */` block that cannot run past its own terminator
const JAVADOC: &str = r"/\*\*[^*]*\*+(?:[^/*][^*]*\*+)*/";

/// Annotation with arguments nested one level deep, e.g. `@Foo(bar = @Baz(1))`
const ANNOTATION: &str = r"@[\w.]+(?:\((?:[^()]|\([^()]*\))*\))?";

const MODIFIERS: &str = "public|private|protected|static|final|abstract|synchronized|strictfp|default|native|transient|volatile";

/// Words that start a statement, never a declaration
const STATEMENT_STARTS: &[&str] = &[
    "throw", "return", "new", "catch", "if", "else", "try", "break", "case",
    "assert", "yield", "continue", "switch", "for", "while", "do",
];

/// Words that can never be a method name
const RESERVED_NAMES: &[&str] = &[
    "throw", "return", "new", "catch", "if", "else", "try", "break", "case",
    "for", "while", "switch", "continue", "synchronized", "assert",
];

const VISIBILITIES: &[&str] = &["public", "private", "protected"];

/// Java parser working from surface patterns and brace counting.
///
/// There is no grammar behind it: classes are found by a header pattern and
/// their bodies by balanced-brace scanning, then methods are searched inside
/// each body with everything belonging to nested classes masked out.
pub struct JavaParser {
    class_regex: Regex,
    method_regex: Regex,
    package_regex: Regex,
    doc_star_regex: Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    Class,
    Interface,
    Enum,
}

impl ClassKind {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "interface" => Self::Interface,
            "enum" => Self::Enum,
            _ => Self::Class,
        }
    }
}

/// The class whose body is being searched for methods
struct ClassScope<'a> {
    qualified_name: String,
    simple_name: &'a str,
    kind: ClassKind,
    description: Option<String>,
}

/// Byte span of a `{ ... }` block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BraceBlock {
    /// Offset of the opening brace
    open: usize,
    /// Offset just past the matching closing brace, or end of text when unbalanced
    end: usize,
    closed: bool,
}

impl BraceBlock {
    /// Everything between the braces
    fn inner(&self) -> Range<usize> {
        let close = if self.closed { self.end - 1 } else { self.end };
        self.open + 1..close
    }
}

/// Find the first `{` at or after `from` and scan to its matching `}`
fn find_block(text: &str, from: usize) -> Option<BraceBlock> {
    let open = from + text.get(from..)?.find('{')?;
    let mut depth = 0usize;

    for (i, byte) in text.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(BraceBlock { open, end: open + i + 1, closed: true });
                }
            }
            _ => {}
        }
    }

    Some(BraceBlock { open, end: text.len(), closed: false })
}

/// Whole input being parsed, with a newline index for line numbers
struct Source<'a> {
    text: &'a str,
    newlines: Vec<usize>,
    /// `//` and `/* */` comment spans, sorted
    comments: Vec<Range<usize>>,
    namespace: Option<String>,
}

impl Source<'_> {
    /// 1-based line of a byte offset
    fn line_of(&self, offset: usize) -> i64 {
        (self.newlines.partition_point(|&nl| nl < offset) + 1) as i64
    }

    fn in_comment(&self, offset: usize) -> bool {
        let idx = self.comments.partition_point(|span| span.end <= offset);
        self.comments.get(idx).map_or(false, |span| span.contains(&offset))
    }
}

/// Spans of line and block comments, skipping over string and char literals
fn comment_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = text[i..].find('\n').map_or(text.len(), |n| i + n);
                spans.push(i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = text[i + 2..].find("*/").map_or(text.len(), |n| i + n + 4);
                spans.push(i..end);
                i = end;
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    spans
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let class_pattern = [
            r"(?P<comments>(?:", JAVADOC, r"\s*|//[^\n]*\n)*)",
            r"(?:", ANNOTATION, r"\s*)*",
            r"(?P<modifiers>(?:(?:public|private|protected|abstract|final|static)\b|\s)+)?\s*",
            r"\b(?P<kind>class|interface|enum)\s+(?P<name>\w+)(?:\s*<[^>]+>)?",
        ]
        .concat();

        let method_pattern = [
            r"(?m)",
            r"(?P<comments>(?:^[ \t]*(?:", JAVADOC, r"|//[^\n]*)\s*)+)?",
            r"(?P<annotations>(?:^[ \t]*(?:", ANNOTATION, r"[ \t]*)+\r?\n)*)",
            r"^[ \t]*",
            r"(?P<inline>(?:", ANNOTATION, r"\s+)*)",
            r"(?P<decl>",
            r"(?P<modifiers>(?:(?:", MODIFIERS, r")\b|\s)+)?",
            r"(?P<type_params><[\w\s,?\[\]]+>\s+)??",
            r"(?:(?P<return_type>[\w<>\[\], ?]+)\s+)?",
            r")",
            r"(?P<name>\w+)\s*",
            r"\((?P<params>(?:[^()]+|\((?:[^()]+|\([^()]*\))*\))*)\)\s*",
            r"(?:throws\s+[^{;]+)?\s*",
            r"(?P<terminator>[{;])",
        ]
        .concat();

        Ok(Self {
            class_regex: Regex::new(&class_pattern).expect("Invalid class header regex"),
            method_regex: Regex::new(&method_pattern).expect("Invalid method header regex"),
            package_regex: Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;")
                .expect("Invalid package regex"),
            doc_star_regex: Regex::new(r"^\s*\*\s?").expect("Invalid doc comment regex"),
        })
    }
}

impl LanguageParser for JavaParser {
    fn parse_content(&mut self, content: &str) -> Result<Vec<FunctionDescription>> {
        let source = Source {
            text: content,
            newlines: content.match_indices('\n').map(|(i, _)| i).collect(),
            comments: comment_spans(content),
            namespace: self
                .package_regex
                .captures(content)
                .map(|caps| caps[1].to_string()),
        };

        let mut functions = Vec::new();
        let found_class = self.find_classes(&source, 0..content.len(), None, &mut functions);

        if !found_class {
            // Bare methods without any enclosing type
            functions = self.parse_methods(&source, 0..content.len(), None);
        }

        Ok(functions)
    }

    fn language(&self) -> Language {
        Language::Java
    }
}

impl JavaParser {
    /// Discover the classes declared directly in `range`, emit their methods and
    /// recurse into their bodies. Returns whether any class header was seen.
    fn find_classes(
        &self,
        source: &Source,
        range: Range<usize>,
        parent: Option<&str>,
        functions: &mut Vec<FunctionDescription>,
    ) -> bool {
        let text = &source.text[range.clone()];
        let mut covered: Vec<Range<usize>> = Vec::new();
        let mut found = false;

        for caps in self.class_regex.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            if source.in_comment(range.start + name.start())
                || !is_class_header_tail(&text[name.end()..])
            {
                continue;
            }
            found = true;

            // Nested classes are handled by the recursive call on their parent
            if covered.iter().any(|r| r.contains(&whole.start())) {
                continue;
            }

            let Some(block) = find_block(text, whole.end()) else {
                continue;
            };
            covered.push(whole.start()..block.end);

            let qualified_name = match parent {
                Some(parent) => format!("{}.{}", parent, name.as_str()),
                None => name.as_str().to_string(),
            };
            let scope = ClassScope {
                qualified_name,
                simple_name: name.as_str(),
                kind: ClassKind::from_keyword(&caps["kind"]),
                description: self.clean_doc_comment(caps.name("comments").map(|m| m.as_str())),
            };

            let inner = block.inner();
            let body = range.start + inner.start..range.start + inner.end;

            functions.extend(self.parse_methods(source, body.clone(), Some(&scope)));
            self.find_classes(source, body, Some(scope.qualified_name.as_str()), functions);
        }

        found
    }

    /// Ranges, relative to `body`, of every class declared anywhere inside it
    fn nested_class_ranges(&self, source: &Source, body: &Range<usize>) -> Vec<Range<usize>> {
        let text = &source.text[body.clone()];
        self.class_regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.name("name")?;
                if source.in_comment(body.start + name.start())
                    || !is_class_header_tail(&text[name.end()..])
                {
                    return None;
                }
                let block = find_block(text, whole.end())?;
                Some(whole.start()..block.end)
            })
            .collect()
    }

    /// Methods declared directly in `body`; members of nested classes are skipped.
    ///
    /// The cursor only moves forward: after every header, accepted or not, the
    /// search resumes past the end of what was consumed.
    fn parse_methods(
        &self,
        source: &Source,
        body: Range<usize>,
        scope: Option<&ClassScope>,
    ) -> Vec<FunctionDescription> {
        let text = &source.text[body.clone()];
        let nested = self.nested_class_ranges(source, &body);
        let mut methods = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let Some(caps) = self.method_regex.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            let commented_out = caps
                .name("name")
                .map_or(false, |name| source.in_comment(body.start + name.start()));
            if commented_out
                || nested.iter().any(|r| r.contains(&whole.start()))
                || !is_declaration(&caps, scope)
            {
                pos = whole.end();
                continue;
            }

            let (body_span, method_end, has_body) = if &caps["terminator"] == ";" {
                (whole.end() - 1..whole.end(), whole.end(), false)
            } else {
                match find_block(text, whole.end() - 1) {
                    Some(block) => (block.open..block.end, block.end, true),
                    None => break,
                }
            };

            // Declarations begin at the start of their first non-blank line
            let matched = whole.as_str();
            let lead = matched.len() - matched.trim_start().len();
            let decl_start = whole.start() + lead;
            let full_start = whole.start()
                + matched[..lead].rfind('\n').map_or(0, |nl| nl + 1);

            let full_text = &text[full_start..method_end];
            let function_text = &text[body_span];

            let method = self.describe_method(
                &caps,
                scope,
                source,
                full_text,
                function_text,
                has_body,
                source.line_of(body.start + decl_start),
                source.line_of(body.start + method_end - 1),
            );
            methods.push(method);

            pos = method_end;
        }

        methods
    }

    #[allow(clippy::too_many_arguments)]
    fn describe_method(
        &self,
        caps: &Captures,
        scope: Option<&ClassScope>,
        source: &Source,
        full_text: &str,
        function_text: &str,
        has_body: bool,
        start_line: i64,
        end_line: i64,
    ) -> FunctionDescription {
        let name = caps["name"].to_string();
        let docstring = self.clean_doc_comment(caps.name("comments").map(|m| m.as_str()));

        let mut decorators: Vec<String> = caps
            .name("annotations")
            .map(|m| m.as_str())
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(inline) = caps.name("inline").map(|m| m.as_str().trim()) {
            if !inline.is_empty() {
                decorators.push(inline.to_string());
            }
        }

        let mut modifiers: Vec<String> = Vec::new();
        for word in caps.name("modifiers").map_or("", |m| m.as_str()).split_whitespace() {
            if !modifiers.iter().any(|m| m == word) {
                modifiers.push(word.to_string());
            }
        }

        if scope.map_or(false, |s| s.kind == ClassKind::Interface) {
            if modifiers.is_empty() {
                modifiers = vec!["public".to_string(), "abstract".to_string()];
            }
            let has = |wanted: &str| modifiers.iter().any(|m| m == wanted);
            if !has_body && !has("default") && !has("static") && !has("abstract") {
                modifiers.push("abstract".to_string());
            }
        }

        let visibility = VISIBILITIES
            .iter()
            .find(|v| modifiers.iter().any(|m| m == *v))
            .copied()
            .unwrap_or("package-private")
            .to_string();

        let return_type = caps
            .name("return_type")
            .and_then(|m| split_top_level_whitespace(m.as_str()).pop());
        let parameters = split_params(caps.name("params").map_or("", |m| m.as_str()));

        let signature_text = match &return_type {
            Some(ret) => format!("{} {}({})", ret, name, parameters.join(", ")),
            None => format!("{}({})", name, parameters.join(", ")),
        };

        FunctionDescription {
            language: Some(Language::Java),
            full_function_text: Some(full_text.to_string()),
            function_text: Some(function_text.to_string()),
            full_function_lines_length: count_lines(full_text),
            function_lines_length: count_lines(function_text),
            docstring_lines_length: docstring.as_deref().map(count_lines),
            docstring,
            qualified_name: Some(match scope {
                Some(s) => format!("{}.{}", s.qualified_name, name),
                None => name.clone(),
            }),
            is_constructor: scope.map_or(false, |s| s.simple_name == name),
            name: Some(name),
            namespace: source.namespace.clone(),
            signature_text,
            return_type,
            parameters,
            start_line,
            end_line,
            is_method: scope.is_some(),
            class_name: scope.map(|s| s.qualified_name.clone()),
            class_description: scope.and_then(|s| s.description.clone()),
            decorators,
            modifiers,
            visibility: Some(visibility),
            has_body,
        }
    }

    /// Strip `/** */` or `//` markers and leading `*` gutters.
    ///
    /// Only blank lines at the very start and end are dropped; blank lines
    /// separating Javadoc tag blocks stay.
    fn clean_doc_comment(&self, raw: Option<&str>) -> Option<String> {
        let text = raw?.trim();
        let text = text
            .strip_prefix("/**")
            .or_else(|| text.strip_prefix("/*"))
            .unwrap_or(text);
        let text = text.strip_suffix("*/").unwrap_or(text);

        let lines: Vec<String> = text
            .lines()
            .map(|line| match line.trim().strip_prefix("//") {
                Some(comment) => comment.trim().to_string(),
                None => self.doc_star_regex.replace(line, "").trim().to_string(),
            })
            .collect();

        let first = lines.iter().position(|line| !line.is_empty())?;
        let last = lines.iter().rposition(|line| !line.is_empty())?;
        Some(lines[first..=last].join("\n"))
    }
}

/// Header text after a class name must continue like a type declaration:
/// generics, `extends`/`implements`/`permits`, or the opening brace
fn is_class_header_tail(rest: &str) -> bool {
    let mut rest = rest.trim_start();
    if rest.starts_with('<') {
        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in rest.char_indices() {
            match c {
                '<' => depth += 1,
                '>' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        match close {
            Some(i) => rest = rest[i + 1..].trim_start(),
            None => return false,
        }
    }

    rest.starts_with('{')
        || ["extends", "implements", "permits"].iter().any(|kw| {
            rest.strip_prefix(kw)
                .map_or(false, |after| after.starts_with(char::is_whitespace))
        })
}

/// Reject headers that are really statements (`return foo(x);`, `for (...) {`)
/// and return-type-less calls that are not constructors of the enclosing class
fn is_declaration(caps: &Captures, scope: Option<&ClassScope>) -> bool {
    let name = &caps["name"];
    if RESERVED_NAMES.contains(&name) {
        return false;
    }

    let decl = caps.name("decl").map_or("", |m| m.as_str());
    let first_word = decl.split_whitespace().next().unwrap_or(name);
    if STATEMENT_STARTS.contains(&first_word) {
        return false;
    }

    match caps.name("return_type") {
        Some(ret) => !ret
            .as_str()
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .any(|word| STATEMENT_STARTS.contains(&word) || RESERVED_NAMES.contains(&word)),
        None => scope.map_or(false, |s| s.simple_name == name),
    }
}

/// Split on whitespace outside `< >`, so `Map<String, Integer>` stays one token
fn split_top_level_whitespace(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for c in text.chars() {
        match c {
            '<' => {
                depth += 1;
                current.push(c);
            }
            '>' => {
                depth -= 1;
                current.push(c);
            }
            c if c.is_whitespace() && depth <= 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Split a parameter list on commas outside `< >` and annotation arguments
fn split_params(params: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for c in params.chars() {
        match c {
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            '<' | '(' => {
                depth += 1;
                current.push(c);
            }
            '>' | ')' => {
                depth -= 1;
                current.push(c);
            }
            _ => current.push(c),
        }
    }
    parts.push(current);

    parts
        .into_iter()
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> Vec<FunctionDescription> {
        JavaParser::new().unwrap().parse_content(code).unwrap()
    }

    fn by_name<'a>(functions: &'a [FunctionDescription], name: &str) -> &'a FunctionDescription {
        functions
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
            .unwrap_or_else(|| panic!("no function named {}", name))
    }

    #[test]
    fn test_simple_method() {
        let code = r#"
    public class Test {
        /** Simple method */
        public int sum(int a, int b) {
            return a + b;
        }
    }
    "#;
        let functions = parse(code);
        assert_eq!(functions.len(), 1);

        let f = &functions[0];
        assert_eq!(f.language, Some(Language::Java));
        assert_eq!(f.name.as_deref(), Some("sum"));
        assert_eq!(f.parameters, vec!["int a", "int b"]);
        assert_eq!(f.return_type.as_deref(), Some("int"));
        assert!(f.has_body);
        assert_eq!(f.docstring.as_deref(), Some("Simple method"));
        assert_eq!(f.docstring_lines_length, Some(1));
        assert_eq!(f.qualified_name.as_deref(), Some("Test.sum"));
        assert_eq!(f.class_name.as_deref(), Some("Test"));
        assert_eq!(f.visibility.as_deref(), Some("public"));
        assert_eq!(f.signature_text, "int sum(int a, int b)");
        assert_eq!((f.start_line, f.end_line), (3, 6));
        assert_eq!(
            f.function_text.as_deref(),
            Some("{\n            return a + b;\n        }")
        );
        assert!(f.full_function_text.as_deref().unwrap().contains("/** Simple method */"));
        assert!(f.is_method);
        assert!(!f.is_constructor);
    }

    #[test]
    fn test_generic_method() {
        let code = r#"
    public class GenericClass {
        public <T, U> T identity(U value) { return null; }
    }
    "#;
        let functions = parse(code);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name.as_deref(), Some("identity"));
        assert_eq!(functions[0].parameters, vec!["U value"]);
        assert_eq!(functions[0].return_type.as_deref(), Some("T"));
    }

    #[test]
    fn test_varargs() {
        let code = "public class VarArgsTest {\n    public void printAll(String... args) {}\n}\n";
        let functions = parse(code);
        assert_eq!(functions[0].parameters, vec!["String... args"]);
        assert!(functions[0].has_body);
    }

    #[test]
    fn test_generic_parameters_and_return_type() {
        let code = r#"
public class Repo {
    public Map<String, Integer> index(Map<String, List<Integer>> source, int limit) {
        return null;
    }
}
"#;
        let functions = parse(code);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].return_type.as_deref(), Some("Map<String, Integer>"));
        assert_eq!(
            functions[0].parameters,
            vec!["Map<String, List<Integer>> source", "int limit"]
        );
    }

    #[test]
    fn test_nested_parentheses_in_parameters() {
        let code = r#"
public class Handlers {
    public void on(@Named("evt(1)") String event, Callback cb) {
        cb.run();
    }
}
"#;
        let functions = parse(code);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].parameters.len(), 2);
        assert_eq!(functions[0].parameters[1], "Callback cb");
    }

    #[test]
    fn test_nested_classes() {
        let code = r#"
    public class Outer {
        public static class Inner {
            public void innerMethod() {}
        }
    }
    "#;
        let functions = parse(code);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].qualified_name.as_deref(), Some("Outer.Inner.innerMethod"));
        assert_eq!(functions[0].class_name.as_deref(), Some("Outer.Inner"));
    }

    #[test]
    fn test_interface_methods() {
        let code = r#"
    public interface MyInterface {
        void abstractMethod();

        default void defaultMethod() {}

        static void staticMethod(String... args) {}

        private void privateMethod() {}
    }
    "#;
        let functions = parse(code);
        assert_eq!(functions.len(), 4);

        let abstract_method = by_name(&functions, "abstractMethod");
        assert!(!abstract_method.has_body);
        assert!(abstract_method.modifiers.contains(&"abstract".to_string()));
        assert_eq!(abstract_method.visibility.as_deref(), Some("public"));
        assert_eq!(abstract_method.function_text.as_deref(), Some(";"));

        let default_method = by_name(&functions, "defaultMethod");
        assert!(default_method.has_body);
        assert_eq!(default_method.modifiers, vec!["default"]);

        let static_method = by_name(&functions, "staticMethod");
        assert!(static_method.has_body);
        assert_eq!(static_method.modifiers, vec!["static"]);
        assert_eq!(static_method.parameters, vec!["String... args"]);

        let private_method = by_name(&functions, "privateMethod");
        assert!(private_method.has_body);
        assert_eq!(private_method.modifiers, vec!["private"]);
        assert_eq!(private_method.visibility.as_deref(), Some("private"));
    }

    #[test]
    fn test_bodyless_interface_method_keeps_explicit_modifiers() {
        let code = "interface Shape {\n    public double area();\n}\n";
        let functions = parse(code);
        assert_eq!(functions[0].modifiers, vec!["public", "abstract"]);
        assert_eq!(functions[0].qualified_name.as_deref(), Some("Shape.area"));
    }

    #[test]
    fn test_docstrings_and_annotations() {
        let code = r#"
    public class AnnotatedTest {
        /**
         * Multi-line comment
         */
        @Deprecated
        @SuppressWarnings("unchecked")
        public void oldMethod() {}

        @Override public String toString() { return "x"; }
    }
    "#;
        let functions = parse(code);
        assert_eq!(functions.len(), 2);

        let old = &functions[0];
        assert_eq!(old.docstring.as_deref(), Some("Multi-line comment"));
        assert_eq!(old.decorators, vec!["@Deprecated", "@SuppressWarnings(\"unchecked\")"]);
        assert!(old.has_body);

        let to_string = &functions[1];
        assert_eq!(to_string.decorators, vec!["@Override"]);
        assert_eq!(to_string.modifiers, vec!["public"]);
        assert_eq!(to_string.return_type.as_deref(), Some("String"));
    }

    #[test]
    fn test_line_comment_docs() {
        let code = "class A {\n    // Adds things.\n    // Carefully.\n    int add(int a, int b) { return a + b; }\n}\n";
        let functions = parse(code);
        assert_eq!(functions[0].docstring.as_deref(), Some("Adds things.\nCarefully."));
        assert_eq!(functions[0].visibility.as_deref(), Some("package-private"));
        assert_eq!(functions[0].start_line, 2);
    }

    #[test]
    fn test_complex_nesting_order() {
        let code = r#"
    public class Outer<T> {
        public void outerMethod(T param) {}
        public static class Inner {
            public <U> U innerMethod(U param) throws Exception { return param; }
        }
        public interface InnerInterface {
            void abstractMethod();
            default void defaultMethod() {}
            static void staticMethod(String... args) {}
            private void privateMethod() {}
        }
    }
    "#;
        let functions = parse(code);
        let names: Vec<_> = functions
            .iter()
            .map(|f| f.qualified_name.clone().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "Outer.outerMethod",
                "Outer.Inner.innerMethod",
                "Outer.InnerInterface.abstractMethod",
                "Outer.InnerInterface.defaultMethod",
                "Outer.InnerInterface.staticMethod",
                "Outer.InnerInterface.privateMethod",
            ]
        );

        let inner = by_name(&functions, "innerMethod");
        assert_eq!(inner.parameters, vec!["U param"]);
        assert_eq!(inner.return_type.as_deref(), Some("U"));

        let interface_methods: Vec<_> = functions
            .iter()
            .filter(|f| f.class_name.as_deref().map_or(false, |c| c.contains("Interface")))
            .collect();
        assert_eq!(interface_methods.len(), 4);
        assert!(!interface_methods[0].has_body);
        assert!(interface_methods[1..].iter().all(|f| f.has_body));
    }

    #[test]
    fn test_deep_nesting_attributes_methods_once() {
        let code = r#"
class A {
    void a() {}
    class B {
        void b() {}
        class C {
            void c() { if (ready) { run(); } }
        }
    }
    void after() {}
}
"#;
        let functions = parse(code);
        let names: Vec<_> = functions
            .iter()
            .map(|f| f.qualified_name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["A.a", "A.after", "A.B.b", "A.B.C.c"]);

        let c = by_name(&functions, "c");
        assert_eq!(c.function_text.as_deref(), Some("{ if (ready) { run(); } }"));
    }

    #[test]
    fn test_constructor_detection() {
        let code = r#"
public class Point {
    private final int x;

    public Point(int x) {
        this.x = x;
    }

    Point() {
        this(0);
    }

    public int getX() { return x; }
}
"#;
        let functions = parse(code);
        assert_eq!(functions.len(), 3);

        assert!(functions[0].is_constructor);
        assert_eq!(functions[0].modifiers, vec!["public"]);
        assert_eq!(functions[0].return_type, None);
        assert_eq!(functions[0].signature_text, "Point(int x)");

        assert!(functions[1].is_constructor);
        assert_eq!(functions[1].visibility.as_deref(), Some("package-private"));

        assert!(!functions[2].is_constructor);
    }

    #[test]
    fn test_statements_are_not_declarations() {
        let code = "return compute(x);\nthrow new IllegalStateException(msg);\nfor (int i = 0; i < n; i++) {\n}\nwhile (busy) {\n}\nsynchronized (lock) {\n}\nhelper(x);\n";
        assert!(parse(code).is_empty());

        let code = "assert isReady(x);\nyield compute(y);\ncontinue;\nswitch (mode) {\n}\ntry (Reader r = open(path)) {\n}\ncatch (IOException e) {\n}\ncase run(x);\n";
        assert!(parse(code).is_empty());
    }

    #[test]
    fn test_initializer_block_statements_are_skipped() {
        let code = "class A {\n    static {\n        assert check(CONFIG);\n        register(A.class);\n    }\n\n    void run() {}\n}\n";
        let functions = parse(code);
        let names: Vec<_> = functions.iter().map(|f| f.display_name()).collect();
        assert_eq!(names, vec!["A.run"]);
    }

    #[test]
    fn test_commented_out_code_is_ignored() {
        let code = r#"
public class A {
    /*
    void old() {
    }
    class Retired {
        void gone() {}
    }
    */
    // void older() {}
    void run() {
        String s = "/* not a comment */";
    }
}
"#;
        let functions = parse(code);
        let names: Vec<_> = functions.iter().map(|f| f.display_name()).collect();
        assert_eq!(names, vec!["A.run"]);
    }

    #[test]
    fn test_annotated_class_keeps_description() {
        let code = "/** Persisted user. */\n@Entity\n@Table(name = \"users\")\npublic class User {\n    public long id() { return 1; }\n}\n";
        let functions = parse(code);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].class_description.as_deref(), Some("Persisted user."));
        assert_eq!(functions[0].qualified_name.as_deref(), Some("User.id"));
    }

    #[test]
    fn test_nested_annotation_arguments() {
        let code = r#"
class Api {
    /** Lists items. */
    @Foo(bar = @Baz(1))
    public void list(@Size(min = 1, max = 5) String s, int n) {}
}
"#;
        let functions = parse(code);
        assert_eq!(functions.len(), 1);

        let list = &functions[0];
        assert_eq!(list.docstring.as_deref(), Some("Lists items."));
        assert_eq!(list.decorators, vec!["@Foo(bar = @Baz(1))"]);
        assert_eq!(list.parameters, vec!["@Size(min = 1, max = 5) String s", "int n"]);
    }

    #[test]
    fn test_bare_method_snippet() {
        let code = "public int add(int a, int b) {\n    return a + b;\n}\n";
        let functions = parse(code);
        assert_eq!(functions.len(), 1);

        let add = &functions[0];
        assert_eq!(add.name.as_deref(), Some("add"));
        assert_eq!(add.qualified_name.as_deref(), Some("add"));
        assert!(!add.is_method);
        assert_eq!(add.class_name, None);
        assert_eq!((add.start_line, add.end_line), (1, 3));
    }

    #[test]
    fn test_package_becomes_namespace() {
        let code = "package com.example.util;\n\npublic class Strings {\n    public static String trim(String s) { return s; }\n}\n";
        let functions = parse(code);
        assert_eq!(functions[0].namespace.as_deref(), Some("com.example.util"));
        assert_eq!(functions[0].modifiers, vec!["public", "static"]);
    }

    #[test]
    fn test_class_word_in_comment_is_not_a_class() {
        let code = r#"
public class Loader {
    public void load() {
        // the class loader is shared
        run();
    }
}
"#;
        let functions = parse(code);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].qualified_name.as_deref(), Some("Loader.load"));
    }

    #[test]
    fn test_unbalanced_braces_run_to_end() {
        let code = "class Broken {\n    void f() {\n        if (x) {\n";
        let functions = parse(code);
        assert_eq!(functions.len(), 1);
        assert!(functions[0].function_text.as_deref().unwrap().starts_with('{'));
    }

    #[test]
    fn test_javadoc_parsing() {
        let code = r#"
    public class LinkedList<E> {
        /**
         * Gets the node at the given index.
         *
         * @param index position of the node, starting at 0.
         * @return the node at {@code index}, of type {@code Node<E>}.
         * @throws IndexOutOfBoundsException if the index is out of range.
         * @see Node
         */
        private Node<E> getByIndex(int index)
        {
            if (index < 0)
            {
                throw new IndexOutOfBoundsException("Index must be a positive number.");
            }

            Node<E> buffNode = head;
            for(int i = 0; i < index; i++)
            {
                if (buffNode.next == null)
                {
                    throw new IndexOutOfBoundsException("Index [" + index + "] out of list.");
                }
                buffNode = buffNode.next;
            }
            return buffNode;
        }
    }
    "#;
        let functions = parse(code);
        assert_eq!(functions.len(), 1);

        let f = &functions[0];
        assert_eq!(f.name.as_deref(), Some("getByIndex"));
        assert_eq!(f.qualified_name.as_deref(), Some("LinkedList.getByIndex"));
        assert_eq!(f.return_type.as_deref(), Some("Node<E>"));
        assert_eq!(f.parameters, vec!["int index"]);
        assert_eq!(f.visibility.as_deref(), Some("private"));
        assert!(f.has_body);

        let expected = "Gets the node at the given index.\n\n\
@param index position of the node, starting at 0.\n\
@return the node at {@code index}, of type {@code Node<E>}.\n\
@throws IndexOutOfBoundsException if the index is out of range.\n\
@see Node";
        assert_eq!(f.docstring.as_deref(), Some(expected));
        assert_eq!(f.docstring_lines_length, Some(6));
    }

    #[test]
    fn test_find_block() {
        let text = "head { a { b } c } tail";
        let block = find_block(text, 0).unwrap();
        assert!(block.closed);
        assert_eq!(&text[block.open..block.end], "{ a { b } c }");
        assert_eq!(&text[block.inner()], " a { b } c ");

        assert_eq!(find_block("no braces", 0), None);

        let open = find_block("x { never closed", 0).unwrap();
        assert!(!open.closed);
        assert_eq!(open.end, "x { never closed".len());
    }

    #[test]
    fn test_split_params() {
        assert_eq!(split_params(""), Vec::<String>::new());
        assert_eq!(split_params("int a,\n   int b"), vec!["int a", "int b"]);
        assert_eq!(split_params("Map<K, V> m, T t"), vec!["Map<K, V> m", "T t"]);
        assert_eq!(
            split_params("@Size(min = 1, max = 5) String s, int n"),
            vec!["@Size(min = 1, max = 5) String s", "int n"]
        );
    }
}
