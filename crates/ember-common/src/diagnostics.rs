//! The diagnostic sink: lexical, syntactic, and semantic errors are all
//! pushed here as they are discovered, in occurrence order, and are never
//! raised as exceptions — a pass that hits one sets the offending node's
//! error flag and keeps going (spec §7).
use serde::Serialize;

use crate::span::LineIndex;

/// A single recoverable error, tied to a byte offset into the source
/// buffer it was raised against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub offset: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(offset: u32, message: String) -> Self {
        Self { offset, message }
    }

    /// Render in the fixed acceptance format:
    /// `<file>:<line>:<col>: <message>` preceded by a two-line source
    /// snippet (the offending source line, then a line with a caret under
    /// the offending column).
    pub fn render(&self, file: &str, source: &str, index: &LineIndex) -> String {
        let (line, col) = index.line_col(self.offset);
        let line_text = source_line(source, index, line);
        let caret_col = (col as usize).saturating_sub(1);
        let mut caret_line = " ".repeat(caret_col);
        caret_line.push('^');
        format!(
            "{file}:{line}:{col}: {msg}\n{line_text}\n{caret_line}\n",
            file = file,
            line = line,
            col = col,
            msg = self.message,
            line_text = line_text,
            caret_line = caret_line,
        )
    }
}

fn source_line(source: &str, index: &LineIndex, line: u32) -> &str {
    let line_idx = (line - 1) as usize;
    let start = index.line_start(line_idx).unwrap_or(source.len() as u32) as usize;
    let end = source[start..]
        .find('\n')
        .map(|rel| start + rel)
        .unwrap_or(source.len());
    &source[start..end]
}

/// Append-only collector. Owns no locks; diagnostics accumulate in the
/// order they are raised.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, offset: u32, message: String) {
        self.diagnostics.push(Diagnostic::new(offset, message));
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// One substitution argument for a `raisef`-style format string. Mirrors
/// the reference compiler's `{t}`/`{s}`/`{c}`/`{i}` tags exactly: `Type` is
/// pre-rendered by the caller (this crate has no notion of `TypeId`), `Str`
/// is a length-prefixed-style string view, `CStr` is a nul-free display
/// string used for raw fragments like operator text, and `Int` is a
/// formatted integer.
pub enum DiagArg<'a> {
    Type(String),
    Str(&'a str),
    CStr(&'a str),
    Int(u64),
}

/// Expand `{t}`/`{s}`/`{c}`/`{i}` tags in `template` against `args`, in
/// order, one argument per tag. Any other byte (including a lone `{` or
/// `}` that isn't part of a recognized tag) is copied through unchanged.
pub fn format_message(template: &str, args: &[DiagArg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if ch != '{' {
            out.push(ch);
            continue;
        }
        let Some(&(_, tag)) = chars.peek() else {
            out.push(ch);
            continue;
        };
        let is_known_tag = matches!(tag, 't' | 's' | 'c' | 'i');
        if !is_known_tag {
            out.push(ch);
            continue;
        }
        chars.next(); // consume the tag char
        match chars.peek() {
            Some(&(_, '}')) => {
                chars.next();
            }
            _ => {
                // Malformed template; emit literally rather than panic —
                // callers' templates are static strings, so this only
                // trips during development.
                out.push('{');
                out.push(tag);
                continue;
            }
        }
        match (tag, args.next()) {
            ('t', Some(DiagArg::Type(s))) => out.push_str(s),
            ('s', Some(DiagArg::Str(s))) => out.push_str(s),
            ('c', Some(DiagArg::CStr(s))) => out.push_str(s),
            ('i', Some(DiagArg::Int(i))) => out.push_str(&i.to_string()),
            _ => debug_assert!(false, "diagnostic template/argument mismatch"),
        }
    }

    out
}
