#![allow(dead_code)]

use lpd_lexer::{Token, TokenKind, tokenize_all};

/// Kinds of every token in `input`, scanning past errors.
pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize_all(input).0.iter().map(Token::kind).collect()
}

/// Tokens of `input` without the trailing `EndOfInput`.
pub fn significant(input: &str) -> Vec<Token> {
    let (mut tokens, _) = tokenize_all(input);
    let last = tokens.pop().expect("at least end of input");
    assert_eq!(last.kind(), TokenKind::EndOfInput, "input: {input:?}");
    tokens
}
