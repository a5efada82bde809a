//! Lexer tests: token classification, longest-match operators, literals,
//! bracket checking, error positions, custom classifiers, and the
//! source-coverage property.

use flowo_lexer::{tokenize, Token, TokenKind};
use flowo_types::{Config, FlowoError, Operator};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn lex_with(source: &str, config: &Config) -> Result<Vec<Token>, FlowoError> {
    tokenize(source, config).collect()
}

fn lex(source: &str) -> Vec<Token> {
    lex_with(source, &Config::default()).expect("unexpected lex error")
}

/// (kind, raw) pairs, whitespace included.
fn pairs(source: &str) -> Vec<(TokenKind, String)> {
    lex(source).into_iter().map(|t| (t.kind, t.raw)).collect()
}

fn lex_error(source: &str) -> FlowoError {
    lex_with(source, &Config::default()).expect_err("expected a lex error")
}

fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.raw.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_arithmetic_expression() {
    use TokenKind::*;
    assert_eq!(
        pairs("1+2*3"),
        vec![
            (Number, "1".into()),
            (Operator, "+".into()),
            (Number, "2".into()),
            (Operator, "*".into()),
            (Number, "3".into()),
        ]
    );
}

#[test]
fn test_word_operators_and_whitespace() {
    use TokenKind::*;
    assert_eq!(
        pairs("atk<def and atk>0"),
        vec![
            (Word, "atk".into()),
            (Operator, "<".into()),
            (Word, "def".into()),
            (Whitespace, " ".into()),
            (Operator, "and".into()),
            (Whitespace, " ".into()),
            (Word, "atk".into()),
            (Operator, ">".into()),
            (Number, "0".into()),
        ]
    );
}

#[test]
fn test_longest_operator_wins() {
    let kinds: Vec<String> = lex("a>=b!=c<=d").into_iter().map(|t| t.raw).collect();
    assert_eq!(kinds, vec!["a", ">=", "b", "!=", "c", "<=", "d"]);
}

#[test]
fn test_operator_prefix_splits_words() {
    // Operators are tried before words, so a leading `or` is an operator.
    use TokenKind::*;
    assert_eq!(
        pairs("origin"),
        vec![(Operator, "or".into()), (Word, "igin".into())]
    );
}

#[test]
fn test_whitespace_runs_are_single_tokens() {
    let tokens = lex("1 \t\n 2");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].kind, TokenKind::Whitespace);
    assert_eq!(tokens[1].raw, " \t\n ");
}

#[test]
fn test_start_offsets() {
    let starts: Vec<usize> = lex("f(10, x)").into_iter().map(|t| t.start).collect();
    assert_eq!(starts, vec![0, 1, 2, 4, 5, 6, 7]);
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_number_accepts_repeated_dots() {
    assert_eq!(pairs("1.2.3"), vec![(TokenKind::Number, "1.2.3".into())]);
}

#[test]
fn test_string_literals() {
    assert_eq!(
        pairs(r#""it's" 'a"b'"#),
        vec![
            (TokenKind::String, r#""it's""#.into()),
            (TokenKind::Whitespace, " ".into()),
            (TokenKind::String, r#"'a"b'"#.into()),
        ]
    );
}

#[test]
fn test_unterminated_string_runs_to_end() {
    assert_eq!(pairs(r#""abc + 1"#), vec![(TokenKind::String, r#""abc + 1"#.into())]);
}

#[test]
fn test_string_hides_operators_and_brackets() {
    assert_eq!(pairs("\"])@\""), vec![(TokenKind::String, "\"])@\"".into())]);
}

// ─────────────────────────────────────────────────────────────────────
// Brackets & errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_lone_close_bracket_is_error_at_zero() {
    let err = lex_error("]");
    assert_eq!(err, FlowoError::MismatchedBracket { position: 0 });
    assert!(err.is_tokenize_error());
}

#[test]
fn test_extra_close_bracket_position() {
    assert_eq!(lex_error("[1]]"), FlowoError::MismatchedBracket { position: 3 });
}

#[test]
fn test_unmatched_open_bracket_is_accepted() {
    let tokens = lex("[[1");
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_unrecognized_character() {
    assert_eq!(
        lex_error("1 @ 2"),
        FlowoError::UnrecognizedCharacter {
            ch: '@',
            position: 2
        }
    );
}

#[test]
fn test_non_ascii_position_is_byte_offset() {
    assert_eq!(
        lex_error("ab+é"),
        FlowoError::UnrecognizedCharacter {
            ch: 'é',
            position: 3
        }
    );
}

#[test]
fn test_bang_alone_is_not_an_operator() {
    assert!(matches!(
        lex_error("!a"),
        FlowoError::UnrecognizedCharacter { ch: '!', position: 0 }
    ));
}

#[test]
fn test_tokens_before_error_are_yielded() {
    let config = Config::default();
    let results: Vec<_> = tokenize("x+@", &config).collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].is_err());
}

// ─────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_configured_operator_is_recognized() {
    let config = Config::builder()
        .operator("@", Operator::binary(|a, _| Ok(a.clone())))
        .build();
    let tokens = lex_with("1@2", &config).unwrap();
    assert_eq!(tokens[1].kind, TokenKind::Operator);
    assert_eq!(tokens[1].raw, "@");
}

#[test]
fn test_custom_classifiers() {
    let config = Config::builder()
        .word_start(|ch| ch == '$' || ch.is_ascii_alphabetic())
        .string_head(|ch| ch == '`')
        .build();
    let tokens = lex_with("$x+`s`", &config).unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Word, TokenKind::Operator, TokenKind::String]
    );
    assert!(lex_with("'s'", &config).is_err());
}

#[test]
fn test_token_json() {
    let tokens = lex("(x)");
    let json = serde_json::to_string(&tokens[1]).unwrap();
    assert_eq!(json, r#"{"kind":"Word","raw":"x","start":1}"#);
}

#[test]
fn test_lex_determinism_100_iterations() {
    let source = "f(3,4,6) + g(3) * -h() ; [1,[2,'x']]";
    let first = lex(source);
    for i in 0..100 {
        assert_eq!(first, lex(source), "Determinism failure at iteration {i}");
    }
}

// ─────────────────────────────────────────────────────────────────────
// Source coverage
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_source_coverage_examples() {
    for source in [
        "1+2*3",
        "atk<def and atk>0",
        "  [ 1 , [ ] ]  ",
        "\"unterminated",
        "f( 'a' , 2.5.1 )",
    ] {
        assert_eq!(concat(&lex(source)), source);
    }
}

proptest! {
    #[test]
    fn prop_tokens_cover_source(source in "[0-9a-z+*/^,;<>=&| ()\\['\"-]{0,40}") {
        let tokens = lex_with(&source, &Config::default()).expect("alphabet is fully lexable");
        prop_assert_eq!(concat(&tokens), source.clone());
        let mut expected_start = 0;
        for token in &tokens {
            prop_assert_eq!(token.start, expected_start);
            expected_start = token.end();
        }
    }
}
