//! Shared types for the Ember compiler front end: spans and the line
//! index, tokens, the arena, the diagnostic sink, and the Unicode General
//! Category table the lexer scans identifiers against.

pub mod arena;
pub mod diagnostics;
pub mod span;
pub mod token;
pub mod unicode;

pub use arena::Arena;
pub use diagnostics::{format_message, DiagArg, Diagnostic, DiagnosticSink};
pub use span::{LineIndex, Span};
pub use token::{keyword_from_str, is_builtin_type, Token, TokenKind};
pub use unicode::{general_category, id_continue, id_start, GeneralCategory};
