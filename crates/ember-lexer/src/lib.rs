//! Tokenizer for the Ember compiler front end.
//!
//! Exposes exactly the two primitive operations the lexer needs to offer:
//! [`Lexer::peek`] returns the current token without consuming it,
//! [`Lexer::consume`] advances past it. Internally this is a single-token
//! lookahead buffer over [`Lexer::scan_token`] — the lexer never buffers
//! more than that.

mod cursor;

use cursor::{Cursor, Decoded};
use ember_common::{id_continue, id_start, keyword_from_str, DiagnosticSink, Token, TokenKind};

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    source: &'src [u8],
    lookahead: Option<Token<'src>>,
    diagnostics: DiagnosticSink,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src [u8]) -> Self {
        Self {
            cursor: Cursor::new(source),
            source,
            lookahead: None,
            diagnostics: DiagnosticSink::new(),
        }
    }

    /// Return the current token without consuming it.
    pub fn peek(&mut self) -> Token<'src> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.scan_token());
        }
        self.lookahead.unwrap()
    }

    /// Consume and return the current token, advancing to the next.
    pub fn consume(&mut self) -> Token<'src> {
        let tok = self.peek();
        self.lookahead = None;
        tok
    }

    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> DiagnosticSink {
        self.diagnostics
    }

    /// Tokenize the whole source, including a trailing `Eof`. Convenience
    /// wrapper for callers that want the full stream up front rather than
    /// driving `peek`/`consume` themselves.
    pub fn tokenize(mut self) -> (Vec<Token<'src>>, DiagnosticSink) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.consume();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn slice(&self, start: u32, end: u32) -> &'src [u8] {
        &self.source[start as usize..end as usize]
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(Decoded::Char { cp, .. }) if is_ascii_whitespace(cp) => {
                    self.cursor.advance();
                }
                _ => break,
            }
        }
    }

    fn scan_token(&mut self) -> Token<'src> {
        self.skip_whitespace();
        let start = self.cursor.pos();

        let Some(decoded) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start, self.slice(start, start));
        };

        let cp = match decoded {
            Decoded::Malformed => {
                self.cursor.advance();
                let end = self.cursor.pos();
                self.diagnostics
                    .push(start, "lexical error: malformed UTF-8 sequence".to_string());
                return Token::new(TokenKind::Illegal, start, end, self.slice(start, end));
            }
            Decoded::Char { cp, .. } => cp,
        };

        if id_start(cp) {
            return self.lex_ident(start);
        }
        if cp < 128 && (cp as u8 as char).is_ascii_digit() {
            return self.lex_number(start);
        }
        if cp == '\'' as u32 {
            return self.lex_char(start);
        }
        if cp == '"' as u32 {
            return self.lex_string(start);
        }

        self.lex_punct(start, cp)
    }

    fn lex_ident(&mut self, start: u32) -> Token<'src> {
        self.cursor.advance();
        self.cursor.eat_while(id_continue);
        let end = self.cursor.pos();
        let bytes = self.slice(start, end);
        let text = std::str::from_utf8(bytes).unwrap_or("");
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, start, end, bytes)
    }

    fn lex_number(&mut self, start: u32) -> Token<'src> {
        self.cursor
            .eat_while(|cp| cp < 128 && (cp as u8 as char).is_ascii_digit());
        let end = self.cursor.pos();
        let bytes = self.slice(start, end);
        let text = std::str::from_utf8(bytes).unwrap_or("0");
        let value: u64 = text.parse().unwrap_or(0);
        Token::new(TokenKind::Num, start, end, bytes).with_value(value)
    }

    fn lex_char(&mut self, start: u32) -> Token<'src> {
        self.cursor.advance(); // opening '
        if self.cursor.peek().is_none() {
            return self.unterminated_char(start);
        }
        self.cursor.advance(); // the one source unit
        match self.cursor.peek() {
            Some(Decoded::Char { cp, .. }) if cp == '\'' as u32 => {
                self.cursor.advance();
                let end = self.cursor.pos();
                Token::new(TokenKind::Char, start, end, self.slice(start, end))
            }
            _ => self.unterminated_char(start),
        }
    }

    fn unterminated_char(&mut self, start: u32) -> Token<'src> {
        self.diagnostics.push(
            start,
            "lexical error: unterminated character literal".to_string(),
        );
        // Recover at the next plausible boundary: whitespace or punctuation.
        loop {
            match self.cursor.peek() {
                None => break,
                Some(Decoded::Char { cp, .. })
                    if is_ascii_whitespace(cp) || is_ascii_punct_boundary(cp) =>
                {
                    break;
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
        let end = self.cursor.pos();
        Token::new(TokenKind::Illegal, start, end, self.slice(start, end))
    }

    fn lex_string(&mut self, start: u32) -> Token<'src> {
        self.cursor.advance(); // opening "
        loop {
            match self.cursor.peek() {
                None => {
                    self.diagnostics.push(
                        start,
                        "lexical error: unterminated string literal".to_string(),
                    );
                    let end = self.cursor.pos();
                    return Token::new(TokenKind::Illegal, start, end, self.slice(start, end));
                }
                Some(Decoded::Char { cp, .. }) if cp == '"' as u32 => {
                    self.cursor.advance();
                    let end = self.cursor.pos();
                    return Token::new(TokenKind::Str, start, end, self.slice(start, end));
                }
                Some(Decoded::Char { cp, .. }) if cp == '\\' as u32 => {
                    self.cursor.advance();
                    self.cursor.advance(); // the escaped unit, whatever it is
                }
                Some(Decoded::Malformed) => {
                    let bad_start = self.cursor.pos();
                    self.cursor.advance();
                    self.diagnostics.push(
                        bad_start,
                        "lexical error: malformed UTF-8 sequence".to_string(),
                    );
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_punct(&mut self, start: u32, cp: u32) -> Token<'src> {
        use TokenKind::*;

        if cp >= 128 {
            self.cursor.advance();
            let end = self.cursor.pos();
            self.diagnostics
                .push(start, "lexical error: illegal byte in input".to_string());
            return Token::new(Illegal, start, end, self.slice(start, end));
        }

        match cp as u8 as char {
            '=' => self.two(start, '=' as u32, EqEq, Eq),
            '!' => self.two(start, '=' as u32, NotEq, Bang),
            '<' => self.two(start, '=' as u32, LtEq, Lt),
            '>' => self.two(start, '=' as u32, GtEq, Gt),
            ':' => self.two(start, ':' as u32, ColonColon, Colon),
            '+' => self.two(start, '+' as u32, PlusPlus, Plus),
            '.' => self.two(start, '.' as u32, DotDot, Dot),
            '-' => {
                self.cursor.advance();
                match self.cursor.peek() {
                    Some(Decoded::Char { cp, .. }) if cp == '>' as u32 => {
                        self.cursor.advance();
                        let end = self.cursor.pos();
                        Token::new(Arrow, start, end, self.slice(start, end))
                    }
                    Some(Decoded::Char { cp, .. }) if cp == '-' as u32 => {
                        self.cursor.advance();
                        let end = self.cursor.pos();
                        Token::new(MinusMinus, start, end, self.slice(start, end))
                    }
                    _ => {
                        let end = self.cursor.pos();
                        Token::new(Minus, start, end, self.slice(start, end))
                    }
                }
            }
            '/' => {
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some(Decoded::Char { cp, .. }) if cp == '/' as u32)
                {
                    self.cursor.eat_while(|cp| cp != '\n' as u32);
                    let end = self.cursor.pos();
                    Token::new(Comment, start, end, self.slice(start, end))
                } else {
                    let end = self.cursor.pos();
                    Token::new(Slash, start, end, self.slice(start, end))
                }
            }
            '*' => self.single(start, Star),
            '%' => self.single(start, Percent),
            '&' => self.single(start, Amp),
            '|' => self.single(start, Pipe),
            '?' => self.single(start, Question),
            ',' => self.single(start, Comma),
            ';' => self.single(start, Semicolon),
            '(' => self.single(start, LParen),
            ')' => self.single(start, RParen),
            '[' => self.single(start, LBracket),
            ']' => self.single(start, RBracket),
            '{' => self.single(start, LBrace),
            '}' => self.single(start, RBrace),
            _ => {
                self.cursor.advance();
                let end = self.cursor.pos();
                self.diagnostics
                    .push(start, "lexical error: illegal byte in input".to_string());
                Token::new(Illegal, start, end, self.slice(start, end))
            }
        }
    }

    fn two(&mut self, start: u32, next: u32, yes: TokenKind, no: TokenKind) -> Token<'src> {
        self.cursor.advance();
        let kind = if matches!(self.cursor.peek(), Some(Decoded::Char { cp, .. }) if cp == next) {
            self.cursor.advance();
            yes
        } else {
            no
        };
        let end = self.cursor.pos();
        Token::new(kind, start, end, self.slice(start, end))
    }

    fn single(&mut self, start: u32, kind: TokenKind) -> Token<'src> {
        self.cursor.advance();
        let end = self.cursor.pos();
        Token::new(kind, start, end, self.slice(start, end))
    }
}

fn is_ascii_whitespace(cp: u32) -> bool {
    matches!(cp, 0x20 | 0x09 | 0x0A | 0x0D)
}

fn is_ascii_punct_boundary(cp: u32) -> bool {
    cp < 128 && !(cp as u8 as char).is_ascii_alphanumeric() && cp != '_' as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let lexer = Lexer::new(src.as_bytes());
        let (toks, _) = lexer.tokenize();
        toks.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_simple_declaration() {
        assert_eq!(
            kinds("let x = 10;"),
            vec![
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Num,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_longest_match_does_not_split_identifier() {
        assert_eq!(kinds("funbar"), vec![TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(kinds("fun"), vec![TokenKind::Fun, TokenKind::Eof]);
    }

    #[test]
    fn numeric_literal_parses_value() {
        let lexer = Lexer::new(b"12345");
        let (toks, _) = lexer.tokenize();
        assert_eq!(toks[0].kind, TokenKind::Num);
        assert_eq!(toks[0].value, Some(12345));
    }

    #[test]
    fn maximal_munch_operators() {
        assert_eq!(
            kinds("== != <= >= -> :: ++ -- .."),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Arrow,
                TokenKind::ColonColon,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::DotDot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comment_is_emitted_not_skipped() {
        assert_eq!(
            kinds("x // a comment\ny"),
            vec![
                TokenKind::Ident,
                TokenKind::Comment,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn string_literal_recognizes_closing_quote() {
        let lexer = Lexer::new(br#""hello""#);
        let (toks, diags) = lexer.tokenize();
        assert_eq!(toks[0].kind, TokenKind::Str);
        assert!(diags.is_empty());
    }

    #[test]
    fn unterminated_string_raises_one_diagnostic() {
        let lexer = Lexer::new(br#""hello"#);
        let (toks, diags) = lexer.tokenize();
        assert_eq!(toks[0].kind, TokenKind::Illegal);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn unterminated_char_literal_recovers_at_next_boundary() {
        let lexer = Lexer::new(b"'x y");
        let (toks, diags) = lexer.tokenize();
        assert_eq!(diags.len(), 1);
        assert_eq!(toks[0].kind, TokenKind::Illegal);
        assert_eq!(toks[1].kind, TokenKind::Ident);
        assert_eq!(toks[1].text(), "y");
    }

    #[test]
    fn illegal_byte_reports_and_skips() {
        let lexer = Lexer::new(b"x @ y");
        let (toks, diags) = lexer.tokenize();
        assert_eq!(diags.len(), 1);
        assert_eq!(
            toks.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Ident,
                TokenKind::Illegal,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn malformed_utf8_is_illegal() {
        let lexer = Lexer::new(&[b'x', 0xFF, b'y']);
        let (toks, diags) = lexer.tokenize();
        assert_eq!(diags.len(), 1);
        assert_eq!(toks[1].kind, TokenKind::Illegal);
    }

    #[test]
    fn unicode_identifier_scans_as_one_token() {
        let lexer = Lexer::new("café".as_bytes());
        let (toks, _) = lexer.tokenize();
        assert_eq!(toks[0].kind, TokenKind::Ident);
        assert_eq!(toks[0].text(), "café");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new(b"let x");
        assert_eq!(lexer.peek().kind, TokenKind::Let);
        assert_eq!(lexer.peek().kind, TokenKind::Let);
        assert_eq!(lexer.consume().kind, TokenKind::Let);
        assert_eq!(lexer.peek().kind, TokenKind::Ident);
    }
}
