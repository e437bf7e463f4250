use tree_sitter::{Language as Grammar, Node, Parser};

use crate::core::model::{count_lines, FunctionDescription, Language};
use crate::error::{CommentsmithError, Result};
use super::LanguageParser;

/// Python-specific parser using Tree-sitter
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let python_language: Grammar = tree_sitter_python::LANGUAGE.into();
        parser.set_language(&python_language)
            .map_err(|e| CommentsmithError::Parser(format!("Failed to set Python language: {}", e)))?;

        Ok(Self { parser })
    }
}

impl LanguageParser for PythonParser {
    fn parse_content(&mut self, content: &str) -> Result<Vec<FunctionDescription>> {
        let Some(tree) = self.parser.parse(content, None) else {
            return Ok(Vec::new());
        };

        let root_node = tree.root_node();
        if root_node.has_error() {
            // Not valid Python; nothing trustworthy to extract
            return Ok(Vec::new());
        }

        let source = SourceText::new(content);
        let mut functions = Vec::new();

        let mut cursor = root_node.walk();
        for child in root_node.named_children(&mut cursor) {
            self.visit_statement(child, &source, None, &mut functions);
        }

        Ok(functions)
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

/// Enclosing class of a method
struct ClassContext {
    name: String,
    path: String,
    description: Option<String>,
}

/// A function or class docstring and the lines its statement occupies
struct Docstring {
    value: String,
    start_line: usize,
    end_line: usize,
}

/// Source text split into lines, newlines kept
struct SourceText<'a> {
    text: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> SourceText<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: text.split_inclusive('\n').collect(),
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        &self.text[node.byte_range()]
    }

    /// Lines `start..=end`, 1-based
    fn slice_lines(&self, start: usize, end: usize) -> String {
        if start == 0 || end < start {
            return String::new();
        }
        let from = (start - 1).min(self.lines.len());
        let to = end.min(self.lines.len());
        self.lines[from..to].concat()
    }
}

impl PythonParser {
    /// Dispatch a statement found directly in a module or class body
    fn visit_statement(
        &self,
        node: Node,
        source: &SourceText,
        class: Option<&ClassContext>,
        functions: &mut Vec<FunctionDescription>,
    ) {
        let Some((definition, decorators)) = unwrap_definition(node, source) else {
            return;
        };

        match definition.kind() {
            "function_definition" => {
                if let Some(function) = self.describe_function(definition, decorators, class, source) {
                    functions.push(function);
                }
            }
            "class_definition" => {
                self.visit_class(definition, class.map(|c| c.path.as_str()), source, functions);
            }
            _ => {}
        }
    }

    /// Walk a class body in declaration order, descending into nested classes
    /// where they appear
    fn visit_class(
        &self,
        node: Node,
        parent_path: Option<&str>,
        source: &SourceText,
        functions: &mut Vec<FunctionDescription>,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };

        let name = source.node_text(name_node).to_string();
        let path = match parent_path {
            Some(parent) => format!("{}.{}", parent, name),
            None => name.clone(),
        };
        let context = ClassContext {
            name,
            path,
            description: find_docstring(body, source).map(|doc| doc.value),
        };

        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            self.visit_statement(child, source, Some(&context), functions);
        }
    }

    fn describe_function(
        &self,
        node: Node,
        decorators: Vec<String>,
        class: Option<&ClassContext>,
        source: &SourceText,
    ) -> Option<FunctionDescription> {
        let name = source.node_text(node.child_by_field_name("name")?).to_string();
        let is_async = node.child(0).map_or(false, |first| first.kind() == "async");

        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| render_parameters(params, source))
            .unwrap_or_default();
        let return_type = node
            .child_by_field_name("return_type")
            .map(|ret| source.node_text(ret).trim().to_string());

        let start_line = node.start_position().row + 1;
        let end_line = code_end_line(node);
        let full_text = source.slice_lines(start_line, end_line);

        let docstring = node
            .child_by_field_name("body")
            .and_then(|body| find_docstring(body, source));

        let (function_text, docstring_lines) = match &docstring {
            Some(doc) => {
                let header = source.slice_lines(start_line, doc.start_line.saturating_sub(1));
                let tail = source.slice_lines(doc.end_line + 1, end_line);
                (header + &tail, doc.end_line - doc.start_line + 1)
            }
            None => (full_text.clone(), 0),
        };

        let signature_text = build_signature(&name, &decorators, &parameters, return_type.as_deref(), is_async);
        let modifiers = build_modifiers(is_async, &decorators);

        let qualified_name = match class {
            Some(context) => format!("{}.{}", context.path, name),
            None => name.clone(),
        };

        Some(FunctionDescription {
            language: Some(Language::Python),
            full_function_lines_length: end_line - start_line + 1,
            function_lines_length: count_lines(&function_text),
            full_function_text: Some(full_text),
            function_text: Some(function_text),
            docstring: docstring.map(|doc| doc.value),
            docstring_lines_length: Some(docstring_lines),
            is_constructor: class.is_some() && name == "__init__",
            qualified_name: Some(qualified_name),
            name: Some(name),
            namespace: None,
            signature_text,
            return_type,
            parameters,
            start_line: start_line as i64,
            end_line: end_line as i64,
            is_method: class.is_some(),
            class_name: class.map(|context| context.name.clone()),
            class_description: class.and_then(|context| context.description.clone()),
            decorators,
            modifiers,
            visibility: None,
            // Python functions always have a body, even if it is just `pass`
            has_body: true,
        })
    }
}

/// Resolve a statement to the function/class definition it carries plus its decorators
fn unwrap_definition<'t>(node: Node<'t>, source: &SourceText) -> Option<(Node<'t>, Vec<String>)> {
    match node.kind() {
        "function_definition" | "class_definition" => Some((node, Vec::new())),
        "decorated_definition" => {
            let definition = node.child_by_field_name("definition")?;
            let mut cursor = node.walk();
            let decorators = node
                .named_children(&mut cursor)
                .filter(|child| child.kind() == "decorator")
                .map(|decorator| decorator_text(decorator, source))
                .collect();
            Some((definition, decorators))
        }
        _ => None,
    }
}

/// Decorator expression without the leading `@`
fn decorator_text(node: Node, source: &SourceText) -> String {
    let mut cursor = node.walk();
    let expression = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");

    match expression {
        Some(expr) => source.node_text(expr).trim().to_string(),
        None => source
            .node_text(node)
            .trim()
            .trim_start_matches('@')
            .trim()
            .to_string(),
    }
}

/// 1-based inclusive line span of a node
fn line_span(node: Node) -> (usize, usize) {
    let start = node.start_position();
    let end = node.end_position();
    // A node ending at column 0 stops at the newline of the previous row
    let end_line = if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    };
    (start.row + 1, end_line)
}

/// Last line holding code in a node; trailing comments the grammar folds into
/// a block do not count
fn code_end_line(node: Node) -> usize {
    let mut current = node;
    loop {
        let mut cursor = current.walk();
        let last = current
            .children(&mut cursor)
            .filter(|child| child.kind() != "comment" && child.start_byte() < child.end_byte())
            .last();
        match last {
            Some(child) => current = child,
            None => break,
        }
    }
    line_span(current).1
}

/// A body's docstring: its first statement, when that is a bare string literal
fn find_docstring(body: Node, source: &SourceText) -> Option<Docstring> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;

    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }

    let value = string_value(first.named_child(0)?, source)?;
    let (start_line, end_line) = line_span(first);

    Some(Docstring {
        value: clean_docstring(&value),
        start_line,
        end_line,
    })
}

/// Evaluated value of a `str` literal expression; `None` for bytes, f-strings
/// and anything that is not a literal
fn string_value(node: Node, source: &SourceText) -> Option<String> {
    match node.kind() {
        "string" => literal_value(source.node_text(node)),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let parts = node
                .named_children(&mut cursor)
                .filter(|child| child.kind() != "comment")
                .map(|part| string_value(part, source))
                .collect::<Option<Vec<_>>>()?;
            Some(parts.concat())
        }
        _ => None,
    }
}

fn literal_value(literal: &str) -> Option<String> {
    let quote_at = literal.find(|c| c == '"' || c == '\'')?;
    let prefix = literal[..quote_at].to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') {
        return None;
    }

    let quoted = &literal[quote_at..];
    let quote_len = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") { 3 } else { 1 };
    if quoted.len() < quote_len * 2 {
        return None;
    }
    // Source newlines read as `\n` whatever the file used
    let body = quoted[quote_len..quoted.len() - quote_len]
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    if prefix.contains('r') {
        Some(body)
    } else {
        Some(unescape(&body))
    }
}

/// Resolve backslash escapes of a non-raw string literal
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut digits = next.to_string();
                while digits.len() < 3 {
                    match chars.peek().copied() {
                        Some(d) if d.is_digit(8) => {
                            digits.push(d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                let decoded = (digits.len() == width && digits.chars().all(|d| d.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32))
                    .flatten();
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

/// Normalise docstring indentation the way `inspect.cleandoc` does
fn clean_docstring(raw: &str) -> String {
    let expanded = expand_tabs(raw, 8);
    let lines: Vec<&str> = expanded.split('\n').collect();

    let indent = |line: &str| line.chars().take_while(|c| c.is_whitespace()).count();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| indent(line))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    if let Some(first) = lines.first() {
        cleaned.push(first.trim_start().to_string());
    }
    for line in lines.iter().skip(1) {
        cleaned.push(line.chars().skip(margin).collect());
    }

    while cleaned.last().map_or(false, |line| line.is_empty()) {
        cleaned.pop();
    }
    let leading = cleaned.iter().take_while(|line| line.is_empty()).count();

    cleaned[leading..].join("\n")
}

fn expand_tabs(text: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let spaces = tab_size - column % tab_size;
                out.extend(std::iter::repeat(' ').take(spaces));
                column += spaces;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Render parameters in declaration order, keeping `/`, `*`, `*args` and
/// `**kwargs` markers and annotations but not defaults
fn render_parameters(params: Node, source: &SourceText) -> Vec<String> {
    let mut cursor = params.walk();
    params
        .named_children(&mut cursor)
        .filter_map(|param| render_parameter(param, source))
        .collect()
}

fn render_parameter(node: Node, source: &SourceText) -> Option<String> {
    let rendered = match node.kind() {
        "comment" => return None,
        "identifier" => source.node_text(node).to_string(),
        "positional_separator" => "/".to_string(),
        "keyword_separator" => "*".to_string(),
        "list_splat_pattern" | "dictionary_splat_pattern" => splat_text(node, source),
        "typed_parameter" => {
            let target = node.named_child(0).map(|t| parameter_target(t, source))?;
            with_annotation(target, node.child_by_field_name("type"), source)
        }
        "default_parameter" => node.child_by_field_name("name").map(|n| parameter_target(n, source))?,
        "typed_default_parameter" => {
            let name = node.child_by_field_name("name").map(|n| parameter_target(n, source))?;
            with_annotation(name, node.child_by_field_name("type"), source)
        }
        _ => source.node_text(node).trim().to_string(),
    };
    Some(rendered)
}

fn parameter_target(node: Node, source: &SourceText) -> String {
    match node.kind() {
        "list_splat_pattern" | "dictionary_splat_pattern" => splat_text(node, source),
        _ => source.node_text(node).trim().to_string(),
    }
}

/// `*name` / `**name` without any whitespace the source may carry after the stars
fn splat_text(node: Node, source: &SourceText) -> String {
    let stars = if node.kind() == "dictionary_splat_pattern" { "**" } else { "*" };
    match node.named_child(0) {
        Some(name) => format!("{}{}", stars, source.node_text(name).trim()),
        None => source.node_text(node).trim().to_string(),
    }
}

fn with_annotation(target: String, annotation: Option<Node>, source: &SourceText) -> String {
    match annotation {
        Some(ty) => format!("{}: {}", target, source.node_text(ty).trim()),
        None => target,
    }
}

fn build_signature(
    name: &str,
    decorators: &[String],
    parameters: &[String],
    return_type: Option<&str>,
    is_async: bool,
) -> String {
    let decorator_lines: String = decorators.iter().map(|d| format!("@{}\n", d)).collect();
    let async_kw = if is_async { "async " } else { "" };
    let ret = return_type.map(|r| format!(" -> {}", r)).unwrap_or_default();
    format!("{}{}def {}({}){}:", decorator_lines, async_kw, name, parameters.join(", "), ret)
}

fn build_modifiers(is_async: bool, decorators: &[String]) -> Vec<String> {
    let matches_decorator = |wanted: &str| {
        decorators
            .iter()
            .any(|d| d == wanted || d.ends_with(&format!(".{}", wanted)))
    };

    let mut modifiers = Vec::new();
    if is_async {
        modifiers.push("async".to_string());
    }
    if matches_decorator("staticmethod") {
        modifiers.push("staticmethod".to_string());
    }
    if matches_decorator("classmethod") {
        modifiers.push("classmethod".to_string());
    }
    modifiers
}
