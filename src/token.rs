use std::fmt;

/// Token kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Reserved words.
    And,
    Begin,
    Char,
    Else,
    End,
    Float,
    For,
    If,
    Int,
    Not,
    Or,
    Prg,
    Read,
    Repeat,
    Return,
    Subrot,
    Then,
    Until,
    Var,
    Void,
    While,
    Write,

    /// Identifier that is not a reserved word.
    Identifier,
    /// Decimal integer constant (`42`).
    IntegerConstant,
    /// Real constant with exactly one decimal point (`3.14`).
    RealConstant,
    /// Double-quoted string constant.
    StringConstant,
    /// Single-quoted character constant.
    CharConstant,

    /// `<-`
    Assign,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `>`
    Greater,
    /// `<`
    Less,

    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `.`
    Dot,

    /// End of the source.
    EndOfInput,
    /// A lexical error; details are in the scanner's diagnostics.
    LexicalError,
}

/// Which payload variant a token kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    None,
    Text,
    Integer,
    Real,
}

impl TokenKind {
    /// Canonical spelling of kinds with a fixed lexeme.
    ///
    /// Returns `None` for constants, identifiers, and the two special
    /// kinds, whose text depends on the source.
    #[must_use]
    pub const fn lexeme(self) -> Option<&'static str> {
        let s = match self {
            Self::And => "and",
            Self::Begin => "begin",
            Self::Char => "char",
            Self::Else => "else",
            Self::End => "end",
            Self::Float => "float",
            Self::For => "for",
            Self::If => "if",
            Self::Int => "int",
            Self::Not => "not",
            Self::Or => "or",
            Self::Prg => "prg",
            Self::Read => "read",
            Self::Repeat => "repeat",
            Self::Return => "return",
            Self::Subrot => "subrot",
            Self::Then => "then",
            Self::Until => "until",
            Self::Var => "var",
            Self::Void => "void",
            Self::While => "while",
            Self::Write => "write",
            Self::Assign => "<-",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Greater => ">",
            Self::Less => "<",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::OpenBracket => "[",
            Self::CloseBracket => "]",
            Self::Dot => ".",
            Self::Identifier
            | Self::IntegerConstant
            | Self::RealConstant
            | Self::StringConstant
            | Self::CharConstant
            | Self::EndOfInput
            | Self::LexicalError => return None,
        };
        Some(s)
    }

    /// The payload a token of this kind must carry.
    #[must_use]
    pub const fn payload(self) -> PayloadKind {
        match self {
            Self::Identifier | Self::StringConstant | Self::CharConstant => PayloadKind::Text,
            Self::IntegerConstant => PayloadKind::Integer,
            Self::RealConstant => PayloadKind::Real,
            _ => PayloadKind::None,
        }
    }

    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::And
                | Self::Begin
                | Self::Char
                | Self::Else
                | Self::End
                | Self::Float
                | Self::For
                | Self::If
                | Self::Int
                | Self::Not
                | Self::Or
                | Self::Prg
                | Self::Read
                | Self::Repeat
                | Self::Return
                | Self::Subrot
                | Self::Then
                | Self::Until
                | Self::Var
                | Self::Void
                | Self::While
                | Self::Write
        )
    }

    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::Equal
                | Self::NotEqual
                | Self::GreaterEqual
                | Self::LessEqual
                | Self::Plus
                | Self::Minus
                | Self::Star
                | Self::Slash
                | Self::Greater
                | Self::Less
        )
    }

    #[must_use]
    pub const fn is_delimiter(self) -> bool {
        matches!(
            self,
            Self::Colon
                | Self::Semicolon
                | Self::Comma
                | Self::OpenParen
                | Self::CloseParen
                | Self::OpenBracket
                | Self::CloseBracket
                | Self::Dot
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme() {
            Some(s) => write!(f, "'{s}'"),
            None => match self {
                Self::Identifier => write!(f, "identifier"),
                Self::IntegerConstant => write!(f, "integer constant"),
                Self::RealConstant => write!(f, "real constant"),
                Self::StringConstant => write!(f, "string constant"),
                Self::CharConstant => write!(f, "character constant"),
                Self::EndOfInput => write!(f, "end of input"),
                _ => write!(f, "lexical error"),
            },
        }
    }
}

/// Token payload.
///
/// Text is kept as the raw source bytes, so literal contents pass
/// through without any decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(Vec<u8>),
    Integer(i64),
    Real(f64),
}

/// A single token with its kind, optional payload, and source line.
///
/// Constructors guarantee the payload matches [`TokenKind::payload`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    value: Option<Value>,
    line: usize,
}

impl Token {
    /// A token without payload.
    ///
    /// `kind` must be one that carries no payload; debug builds check it.
    #[must_use]
    pub fn new(kind: TokenKind, line: usize) -> Self {
        debug_assert_eq!(
            kind.payload(),
            PayloadKind::None,
            "{kind:?} requires a payload"
        );
        Self {
            kind,
            value: None,
            line,
        }
    }

    #[must_use]
    pub const fn identifier(text: Vec<u8>, line: usize) -> Self {
        Self::with_value(TokenKind::Identifier, Value::Text(text), line)
    }

    #[must_use]
    pub const fn string(text: Vec<u8>, line: usize) -> Self {
        Self::with_value(TokenKind::StringConstant, Value::Text(text), line)
    }

    #[must_use]
    pub const fn character(text: Vec<u8>, line: usize) -> Self {
        Self::with_value(TokenKind::CharConstant, Value::Text(text), line)
    }

    #[must_use]
    pub const fn integer(value: i64, line: usize) -> Self {
        Self::with_value(TokenKind::IntegerConstant, Value::Integer(value), line)
    }

    #[must_use]
    pub const fn real(value: f64, line: usize) -> Self {
        Self::with_value(TokenKind::RealConstant, Value::Real(value), line)
    }

    const fn with_value(kind: TokenKind, value: Value, line: usize) -> Self {
        Self {
            kind,
            value: Some(value),
            line,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// 1-based line of the token's first significant character.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Raw payload bytes of identifiers, strings, and character constants.
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.value {
            Some(Value::Text(b)) => Some(b),
            _ => None,
        }
    }

    /// Text payload, if it is valid UTF-8.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    #[must_use]
    pub const fn integer_value(&self) -> Option<i64> {
        match self.value {
            Some(Value::Integer(n)) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn real_value(&self) -> Option<f64> {
        match self.value {
            Some(Value::Real(x)) => Some(x),
            _ => None,
        }
    }

    /// True for `EndOfInput` and `LexicalError`, where the reference
    /// driver stops pulling tokens.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfInput | TokenKind::LexicalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_kinds_have_lexemes() {
        assert_eq!(TokenKind::Assign.lexeme(), Some("<-"));
        assert_eq!(TokenKind::Subrot.lexeme(), Some("subrot"));
        assert_eq!(TokenKind::Identifier.lexeme(), None);
        assert_eq!(TokenKind::EndOfInput.lexeme(), None);
    }

    #[test]
    fn payload_matches_kind() {
        assert_eq!(Token::identifier("x".into(), 1).kind().payload(), PayloadKind::Text);
        assert_eq!(Token::integer(3, 1).integer_value(), Some(3));
        assert_eq!(Token::real(1.5, 1).real_value(), Some(1.5));
        assert_eq!(Token::new(TokenKind::Plus, 1).value(), None);
        assert_eq!(Token::character("a".into(), 2).text(), Some("a"));
    }

    #[test]
    fn text_is_a_checked_view_of_bytes() {
        let token = Token::string(vec![b'O', b'l', 0xe1], 1);
        assert_eq!(token.bytes(), Some(&b"Ol\xe1"[..]));
        assert_eq!(token.text(), None);
        assert_eq!(Token::integer(1, 1).bytes(), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "requires a payload")]
    fn payloadless_constructor_rejects_constants() {
        let _ = Token::new(TokenKind::IntegerConstant, 1);
    }

    #[test]
    fn categories_are_disjoint() {
        for kind in [TokenKind::And, TokenKind::Assign, TokenKind::Dot] {
            let n = [kind.is_keyword(), kind.is_operator(), kind.is_delimiter()]
                .iter()
                .filter(|b| **b)
                .count();
            assert_eq!(n, 1, "{kind:?}");
        }
    }

    #[test]
    fn display_kind() {
        assert_eq!(TokenKind::LessEqual.to_string(), "'<='");
        assert_eq!(TokenKind::RealConstant.to_string(), "real constant");
    }
}
