//! Reserved words of the language.

use crate::token::TokenKind;

/// Every reserved spelling and the kind it maps to.
pub const KEYWORDS: [(&str, TokenKind); 22] = [
    ("and", TokenKind::And),
    ("begin", TokenKind::Begin),
    ("char", TokenKind::Char),
    ("else", TokenKind::Else),
    ("end", TokenKind::End),
    ("float", TokenKind::Float),
    ("for", TokenKind::For),
    ("if", TokenKind::If),
    ("int", TokenKind::Int),
    ("not", TokenKind::Not),
    ("or", TokenKind::Or),
    ("prg", TokenKind::Prg),
    ("read", TokenKind::Read),
    ("repeat", TokenKind::Repeat),
    ("return", TokenKind::Return),
    ("subrot", TokenKind::Subrot),
    ("then", TokenKind::Then),
    ("until", TokenKind::Until),
    ("var", TokenKind::Var),
    ("void", TokenKind::Void),
    ("while", TokenKind::While),
    ("write", TokenKind::Write),
];

/// Look up a reserved word. Matching is case-sensitive.
#[must_use]
pub fn lookup(text: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(spelling, _)| *spelling == text)
        .map(|&(_, kind)| kind)
}
