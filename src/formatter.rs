//! Human-readable token listing.
//!
//! One line per token: line number, kind, then the lexeme or payload.

use std::fmt::Write;

use crate::token::{Token, TokenKind, Value};

/// Format a single token as `Line N    Kind             lexeme`.
#[must_use]
pub fn format_token(token: &Token) -> String {
    let kind = format!("{:?}", token.kind());
    let mut out = format!("Line {:<4} {kind:<16} ", token.line());
    push_lexeme(&mut out, token);
    out
}

/// Format a token sequence, one token per line.
#[must_use]
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&format_token(token));
        out.push('\n');
    }
    out
}

fn push_lexeme(out: &mut String, token: &Token) {
    if let Some(lexeme) = token.kind().lexeme() {
        out.push_str(lexeme);
        return;
    }
    match (token.kind(), token.value()) {
        (TokenKind::StringConstant, Some(Value::Text(b))) => {
            let _ = write!(out, "\"{}\"", String::from_utf8_lossy(b));
        }
        (TokenKind::CharConstant, Some(Value::Text(b))) => {
            let _ = write!(out, "'{}'", String::from_utf8_lossy(b));
        }
        (_, Some(Value::Text(b))) => out.push_str(&String::from_utf8_lossy(b)),
        (_, Some(Value::Integer(n))) => {
            let _ = write!(out, "{n}");
        }
        (_, Some(Value::Real(x))) => {
            let _ = write!(out, "{x:?}");
        }
        (TokenKind::EndOfInput, None) => out.push_str("--- end of input ---"),
        (_, None) => out.push_str("### lexical error ###"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_spelling() {
        let line = format_token(&Token::new(TokenKind::Assign, 3));
        assert_eq!(line, "Line 3    Assign           <-");
    }

    #[test]
    fn payloads() {
        assert!(format_token(&Token::identifier("total".into(), 1)).ends_with(" total"));
        assert!(format_token(&Token::integer(42, 1)).ends_with(" 42"));
        assert!(format_token(&Token::real(2.0, 1)).ends_with(" 2.0"));
        assert!(format_token(&Token::string("hi".into(), 1)).ends_with(" \"hi\""));
        assert!(format_token(&Token::character("c".into(), 1)).ends_with(" 'c'"));
    }

    #[test]
    fn non_utf8_payload_is_shown_lossily() {
        let line = format_token(&Token::string(vec![b'O', b'l', 0xe1], 1));
        assert!(line.ends_with(" \"Ol\u{FFFD}\""), "{line}");
    }

    #[test]
    fn special_kinds() {
        assert!(format_token(&Token::new(TokenKind::EndOfInput, 9)).contains("end of input"));
        assert!(format_token(&Token::new(TokenKind::LexicalError, 9)).contains("lexical error"));
    }

    #[test]
    fn listing_has_one_line_per_token() {
        let tokens = crate::tokenize("a + b").expect("tokenize");
        assert_eq!(format_tokens(&tokens).lines().count(), 4);
    }
}
