use ember_lexer::Lexer;
use insta::assert_yaml_snapshot;
use serde::Serialize;

/// A human-readable representation of a token for snapshot testing.
#[derive(Serialize)]
struct TokenSnapshot {
    kind: String,
    text: String,
    span: (u32, u32),
    value: Option<u64>,
}

fn tokenize_snapshot(source: &str) -> Vec<TokenSnapshot> {
    let lexer = Lexer::new(source.as_bytes());
    let (tokens, _diags) = lexer.tokenize();
    tokens
        .into_iter()
        .map(|tok| TokenSnapshot {
            kind: format!("{:?}", tok.kind),
            text: tok.text().to_string(),
            span: (tok.span.start, tok.span.end),
            value: tok.value,
        })
        .collect()
}

#[test]
fn keywords_and_builtin_types() {
    let tokens = tokenize_snapshot("let mut fun if else while return case struct enum union error import and or true false s32 string bool");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn operators_maximal_munch() {
    let tokens = tokenize_snapshot("== != <= >= -> :: ++ -- .. < > - : + . * / % & | = ! ? , ; ( ) [ ] { }");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn decimal_numbers() {
    let tokens = tokenize_snapshot("0 7 42 1000000");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn identifiers_plain_and_unicode() {
    let tokens = tokenize_snapshot("x foo_bar _leading café 中文");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn simple_string_literal() {
    let tokens = tokenize_snapshot(r#""hello world""#);
    assert_yaml_snapshot!(tokens);
}

#[test]
fn string_with_escaped_quote() {
    let tokens = tokenize_snapshot(r#""price: \"ok\"""#);
    assert_yaml_snapshot!(tokens);
}

#[test]
fn line_comment_is_a_token() {
    let tokens = tokenize_snapshot("let x = 1 // trailing note\nlet y = 2");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn mixed_expression() {
    let tokens = tokenize_snapshot("let result = add(1, 2) + multiply(3, x.field)");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn scoped_ident_and_empty_string_punctuation() {
    let tokens = tokenize_snapshot("::foo::bar");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn char_literal() {
    let tokens = tokenize_snapshot("'x'");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn empty_input_yields_only_eof() {
    let tokens = tokenize_snapshot("");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn whitespace_only_yields_only_eof() {
    let tokens = tokenize_snapshot("   \t \r\n  ");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn unterminated_char_literal_recovers() {
    let tokens = tokenize_snapshot("'x y");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn unterminated_string_literal() {
    let tokens = tokenize_snapshot(r#""hello"#);
    assert_yaml_snapshot!(tokens);
}

#[test]
fn illegal_byte_is_skipped_with_diagnostic() {
    let tokens = tokenize_snapshot("x @ y");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn crlf_newlines_are_whitespace() {
    let tokens = tokenize_snapshot("let x = 1\r\nlet y = 2");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn full_small_program() {
    let source = r#"
import std::io;

struct Point {
    x s32,
    y s32,
}

fun distance(a Point, b Point) -> s32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    return dx * dx + dy * dy;
}
"#;
    let tokens = tokenize_snapshot(source);
    assert_yaml_snapshot!(tokens);
}
