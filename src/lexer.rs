use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::Error;
use crate::keywords;
use crate::source::CharacterSource;
use crate::token::{Token, TokenKind};

/// Longest lexeme text kept in a token; longer runs are still consumed.
pub const MAX_LEXEME_LEN: usize = 255;

/// Classifies a lexer diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// `{` comment still open at end of input.
    UnterminatedComment,
    /// Identifier longer than [`MAX_LEXEME_LEN`]; only a warning.
    IdentifierTruncated,
    /// Second `.` inside a numeric constant.
    MultipleDecimalPoints,
    /// Integer constant that does not fit in `i64`.
    ///
    /// The one case where a long numeral is reported instead of being
    /// truncated silently: a truncated integer could not hold its value
    /// anyway.
    IntegerOutOfRange,
    /// Newline or end of input before the closing `"`.
    UnterminatedString,
    /// Character constant that is not exactly one character between quotes.
    MalformedCharConstant,
    /// `=` not followed by `=`.
    InvalidEquals,
    /// `!` not followed by `=`.
    InvalidBang,
    /// Byte that cannot start any token.
    InvalidCharacter(u8),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedComment => write!(f, "unterminated comment"),
            Self::IdentifierTruncated => {
                write!(f, "identifier truncated to {MAX_LEXEME_LEN} characters")
            }
            Self::MultipleDecimalPoints => {
                write!(f, "number with multiple decimal points")
            }
            Self::IntegerOutOfRange => write!(f, "integer constant out of range"),
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::MalformedCharConstant => {
                write!(f, "malformed character constant")
            }
            Self::InvalidEquals => {
                write!(
                    f,
                    "invalid symbol '=', use '==' for equality \
                     or '<-' for assignment"
                )
            }
            Self::InvalidBang => {
                write!(f, "invalid symbol '!', use '!=' for inequality")
            }
            Self::InvalidCharacter(b) => {
                write!(f, "invalid character '{}' (code {b})", b.escape_ascii())
            }
        }
    }
}

/// Diagnostic produced during scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
}

impl LexError {
    #[must_use]
    pub const fn new(kind: LexErrorKind, line: usize) -> Self {
        Self { kind, line }
    }

    /// Warnings leave the token intact; everything else yields
    /// [`TokenKind::LexicalError`].
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self.kind, LexErrorKind::IdentifierTruncated)
    }
}

/// Tokenize a source string, stopping at the first lexical error.
///
/// On success the last token is [`TokenKind::EndOfInput`].
///
/// # Errors
///
/// Returns the first `LexError` that produced a
/// [`TokenKind::LexicalError`] token. Warnings do not stop scanning.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::from_text(input);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.try_next_token()?;
        let done = token.kind() == TokenKind::EndOfInput;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Tokenize a source string, continuing past lexical errors.
///
/// Returns every token (error tokens included, ending with
/// [`TokenKind::EndOfInput`]) and every diagnostic in source order.
#[must_use]
pub fn tokenize_all(input: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut scanner = Scanner::from_text(input);
    let tokens = scanner.by_ref().collect();
    (tokens, scanner.take_diagnostics())
}

/// Pull-based scanner over a byte stream.
///
/// Each call to [`next_token`](Self::next_token) returns exactly one
/// token. The scanner owns its input and line counter, so separate
/// scanners never share state.
pub struct Scanner<R> {
    source: Option<CharacterSource<R>>,
    diagnostics: Vec<LexError>,
    last_line: usize,
    finished: bool,
}

impl Scanner<File> {
    /// Open a source file for scanning.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "scanner opened");
        Ok(Self::new(file))
    }
}

impl<'a> Scanner<&'a [u8]> {
    /// Scan an in-memory source.
    #[must_use]
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<R: Read> Scanner<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            source: Some(CharacterSource::new(reader)),
            diagnostics: Vec::new(),
            last_line: 1,
            finished: false,
        }
    }

    /// Scan the next token.
    ///
    /// Lexical errors come back as [`TokenKind::LexicalError`] tokens;
    /// the matching [`LexError`] is recorded in
    /// [`diagnostics`](Self::diagnostics). Scanning may continue after an
    /// error.
    pub fn next_token(&mut self) -> Token {
        self.try_next_token()
            .unwrap_or_else(|err| Token::new(TokenKind::LexicalError, err.line))
    }

    /// Scan the next token, returning lexical errors as `Err`.
    ///
    /// The error is also recorded in [`diagnostics`](Self::diagnostics).
    ///
    /// # Errors
    ///
    /// Returns a `LexError` for any input that does not form a token.
    pub fn try_next_token(&mut self) -> Result<Token, LexError> {
        let Some(source) = self.source.as_mut() else {
            return Ok(Token::new(TokenKind::EndOfInput, self.last_line));
        };

        let line = source.line();
        let result = Scan {
            src: source,
            warnings: &mut self.diagnostics,
            line,
        }
        .token();
        self.last_line = source.line();

        match &result {
            Ok(token) => {
                tracing::trace!(line = token.line(), kind = ?token.kind(), "token");
            }
            Err(err) => {
                tracing::error!(line = err.line, "{}", err.kind);
                self.diagnostics.push(*err);
            }
        }
        result
    }

    /// Release the input. Calling it again does nothing.
    ///
    /// After closing, the scanner only produces
    /// [`TokenKind::EndOfInput`].
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            tracing::debug!(line = self.last_line, "scanner closed");
        }
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Current line of the input.
    #[must_use]
    pub fn line(&self) -> usize {
        self.source
            .as_ref()
            .map_or(self.last_line, CharacterSource::line)
    }

    /// Errors and warnings reported so far, in source order.
    #[must_use]
    pub fn diagnostics(&self) -> &[LexError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// Yields every token up to and including [`TokenKind::EndOfInput`].
impl<R: Read> Iterator for Scanner<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        self.finished = token.kind() == TokenKind::EndOfInput;
        Some(token)
    }
}

/// Lexeme classes with a bounded text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexemeClass {
    Identifier,
    Number,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Truncation {
    Warn,
    Silent,
}

const fn truncation_policy(class: LexemeClass) -> Truncation {
    match class {
        LexemeClass::Identifier => Truncation::Warn,
        LexemeClass::Number | LexemeClass::String => Truncation::Silent,
    }
}

/// Bounded lexeme text. Bytes past [`MAX_LEXEME_LEN`] are dropped.
struct Lexeme {
    class: LexemeClass,
    bytes: Vec<u8>,
    truncated: bool,
}

impl Lexeme {
    const fn new(class: LexemeClass) -> Self {
        Self {
            class,
            bytes: Vec::new(),
            truncated: false,
        }
    }

    fn push(&mut self, b: u8) {
        if self.bytes.len() < MAX_LEXEME_LEN {
            self.bytes.push(b);
        } else {
            self.truncated = true;
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Text of an identifier or number. Those classes only accept ASCII.
    fn ascii_text(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// State for scanning a single token.
struct Scan<'a, R> {
    src: &'a mut CharacterSource<R>,
    warnings: &'a mut Vec<LexError>,
    line: usize,
}

impl<R: Read> Scan<'_, R> {
    fn token(mut self) -> Result<Token, LexError> {
        let ch = self.skip_insignificant()?;
        self.line = self.src.line();

        let Some(ch) = ch else {
            return Ok(self.simple(TokenKind::EndOfInput));
        };

        match ch {
            b if b.is_ascii_alphabetic() => Ok(self.identifier(b)),
            b if b.is_ascii_digit() => self.number(b),
            b'<' => Ok(match self.src.next() {
                Some(b'-') => self.simple(TokenKind::Assign),
                Some(b'=') => self.simple(TokenKind::LessEqual),
                other => {
                    self.src.pushback(other);
                    self.simple(TokenKind::Less)
                }
            }),
            b'>' => Ok(match self.src.next() {
                Some(b'=') => self.simple(TokenKind::GreaterEqual),
                other => {
                    self.src.pushback(other);
                    self.simple(TokenKind::Greater)
                }
            }),
            b'=' => match self.src.next() {
                Some(b'=') => Ok(self.simple(TokenKind::Equal)),
                other => {
                    self.src.pushback(other);
                    Err(self.error(LexErrorKind::InvalidEquals))
                }
            },
            b'!' => match self.src.next() {
                Some(b'=') => Ok(self.simple(TokenKind::NotEqual)),
                other => {
                    self.src.pushback(other);
                    Err(self.error(LexErrorKind::InvalidBang))
                }
            },
            b'+' => Ok(self.simple(TokenKind::Plus)),
            b'-' => Ok(self.simple(TokenKind::Minus)),
            b'*' => Ok(self.simple(TokenKind::Star)),
            b'/' => Ok(self.simple(TokenKind::Slash)),
            b'(' => Ok(self.simple(TokenKind::OpenParen)),
            b')' => Ok(self.simple(TokenKind::CloseParen)),
            b'[' => Ok(self.simple(TokenKind::OpenBracket)),
            b']' => Ok(self.simple(TokenKind::CloseBracket)),
            b';' => Ok(self.simple(TokenKind::Semicolon)),
            b',' => Ok(self.simple(TokenKind::Comma)),
            b':' => Ok(self.simple(TokenKind::Colon)),
            b'.' => Ok(self.simple(TokenKind::Dot)),
            b'"' => self.string(),
            b'\'' => self.character(),
            b => Err(self.error(LexErrorKind::InvalidCharacter(b))),
        }
    }

    /// Skip whitespace and `{ ... }` comments, returning the first
    /// significant byte.
    fn skip_insignificant(&mut self) -> Result<Option<u8>, LexError> {
        loop {
            match self.src.next() {
                Some(b) if is_space(b) => {}
                Some(b'{') => {
                    let open_line = self.src.line();
                    loop {
                        match self.src.next() {
                            Some(b'}') => break,
                            Some(_) => {}
                            None => {
                                return Err(LexError::new(
                                    LexErrorKind::UnterminatedComment,
                                    open_line,
                                ));
                            }
                        }
                    }
                }
                other => return Ok(other),
            }
        }
    }

    fn identifier(&mut self, first: u8) -> Token {
        let mut lexeme = Lexeme::new(LexemeClass::Identifier);
        let mut ch = Some(first);
        while let Some(b) = ch.filter(|b| b.is_ascii_alphanumeric() || *b == b'_') {
            lexeme.push(b);
            ch = self.src.next();
        }
        self.src.pushback(ch);
        self.check_truncation(&lexeme);

        match keywords::lookup(lexeme.ascii_text()) {
            Some(kind) => self.simple(kind),
            None => Token::identifier(lexeme.into_bytes(), self.line),
        }
    }

    fn number(&mut self, first: u8) -> Result<Token, LexError> {
        let mut lexeme = Lexeme::new(LexemeClass::Number);
        let mut seen_dot = false;
        let mut ch = Some(first);
        while let Some(b) = ch.filter(|b| b.is_ascii_digit() || *b == b'.') {
            if b == b'.' {
                if seen_dot {
                    self.src.pushback(ch);
                    return Err(self.error(LexErrorKind::MultipleDecimalPoints));
                }
                seen_dot = true;
            }
            lexeme.push(b);
            ch = self.src.next();
        }
        self.src.pushback(ch);
        self.check_truncation(&lexeme);

        let text = lexeme.ascii_text();
        if seen_dot {
            // Digits with at most one dot always parse; overflow gives `inf`.
            let value = text.parse::<f64>().unwrap_or(f64::INFINITY);
            Ok(Token::real(value, self.line))
        } else {
            text.parse::<i64>()
                .map(|n| Token::integer(n, self.line))
                .map_err(|_| self.error(LexErrorKind::IntegerOutOfRange))
        }
    }

    fn string(&mut self) -> Result<Token, LexError> {
        let mut lexeme = Lexeme::new(LexemeClass::String);
        loop {
            match self.src.next() {
                Some(b'"') => break,
                None | Some(b'\n') => {
                    return Err(self.error(LexErrorKind::UnterminatedString));
                }
                Some(b) => lexeme.push(b),
            }
        }
        self.check_truncation(&lexeme);
        Ok(Token::string(lexeme.into_bytes(), self.line))
    }

    fn character(&mut self) -> Result<Token, LexError> {
        let ch = self.src.next();
        let close = self.src.next();
        match (ch, close) {
            (Some(c), Some(b'\'')) => {
                Ok(Token::character(vec![c], self.line))
            }
            _ => {
                self.src.pushback(close);
                self.src.pushback(ch);
                Err(self.error(LexErrorKind::MalformedCharConstant))
            }
        }
    }

    fn check_truncation(&mut self, lexeme: &Lexeme) {
        if !lexeme.truncated {
            return;
        }
        match truncation_policy(lexeme.class) {
            Truncation::Warn => {
                let warning = LexError::new(LexErrorKind::IdentifierTruncated, self.line);
                tracing::warn!(line = self.line, "{}", warning.kind);
                self.warnings.push(warning);
            }
            Truncation::Silent => {}
        }
    }

    fn simple(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.line)
    }

    const fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.line)
    }
}

/// Whitespace as the C locale's `isspace` defines it.
const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize_all(input).0.iter().map(Token::kind).collect()
    }

    #[test]
    fn assignment_statement() {
        let tokens = tokenize("x <- 10;\n").expect("should tokenize");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0], Token::identifier("x".into(), 1));
        assert_eq!(tokens[1].kind(), TokenKind::Assign);
        assert_eq!(tokens[2], Token::integer(10, 1));
        assert_eq!(tokens[3].kind(), TokenKind::Semicolon);
        assert_eq!(tokens[4].kind(), TokenKind::EndOfInput);
        assert_eq!(tokens[4].line(), 2);
    }

    #[test]
    fn less_than_family() {
        assert_eq!(kinds("<-"), [TokenKind::Assign, TokenKind::EndOfInput]);
        assert_eq!(kinds("<="), [TokenKind::LessEqual, TokenKind::EndOfInput]);
        assert_eq!(
            kinds("<x"),
            [TokenKind::Less, TokenKind::Identifier, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(kinds("prg"), [TokenKind::Prg, TokenKind::EndOfInput]);
        assert_eq!(kinds("PRG"), [TokenKind::Identifier, TokenKind::EndOfInput]);
    }

    #[test]
    fn real_constant() {
        let tokens = tokenize("3.25").expect("should tokenize");
        assert_eq!(tokens[0].real_value(), Some(3.25));
    }

    #[test]
    fn trailing_dot_is_real() {
        let tokens = tokenize("7.").expect("should tokenize");
        assert_eq!(tokens[0].real_value(), Some(7.0));
    }

    #[test]
    fn second_decimal_point_is_error() {
        let mut scanner = Scanner::from_text("1.2.3");
        let token = scanner.next_token();
        assert_eq!(token.kind(), TokenKind::LexicalError);
        assert_eq!(token.value(), None);
        assert_eq!(
            scanner.diagnostics(),
            [LexError::new(LexErrorKind::MultipleDecimalPoints, 1)]
        );
        // The offending dot was pushed back.
        assert_eq!(scanner.next_token().kind(), TokenKind::Dot);
        assert_eq!(scanner.next_token(), Token::integer(3, 1));
    }

    #[test]
    fn unterminated_comment_reports_opening_line() {
        let mut scanner = Scanner::from_text("a\n{ open\n\n\n");
        assert_eq!(scanner.next_token().kind(), TokenKind::Identifier);
        let token = scanner.next_token();
        assert_eq!(token.kind(), TokenKind::LexicalError);
        assert_eq!(token.line(), 2);
        assert_eq!(scanner.next_token().kind(), TokenKind::EndOfInput);
    }

    #[test]
    fn comment_is_skipped() {
        assert_eq!(
            kinds("{ note }end{x}{y}."),
            [TokenKind::End, TokenKind::Dot, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn token_after_multiline_comment_gets_its_own_line() {
        let tokens = tokenize("{a\nb}x").expect("should tokenize");
        assert_eq!(tokens[0].line(), 2);
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize("\"abc").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn string_stops_at_newline() {
        let mut scanner = Scanner::from_text("\"abc\nx");
        assert_eq!(scanner.next_token().kind(), TokenKind::LexicalError);
        let next = scanner.next_token();
        assert_eq!(next, Token::identifier("x".into(), 2));
    }

    #[test]
    fn string_has_no_escapes() {
        // The quote after the backslash closes the first string.
        let (tokens, diagnostics) = tokenize_all(r#""a\" b""#);
        assert_eq!(tokens[0].text(), Some("a\\"));
        assert_eq!(tokens[1].text(), Some("b"));
        assert_eq!(tokens[2].kind(), TokenKind::LexicalError);
        assert_eq!(diagnostics[0].kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn char_constant() {
        let tokens = tokenize("'a'").expect("should tokenize");
        assert_eq!(tokens[0], Token::character("a".into(), 1));
    }

    #[test]
    fn malformed_char_constant_pushes_back_both() {
        let mut scanner = Scanner::from_text("'ab'");
        assert_eq!(scanner.next_token().kind(), TokenKind::LexicalError);
        assert_eq!(scanner.next_token(), Token::identifier("ab".into(), 1));
        assert_eq!(
            scanner.diagnostics(),
            [LexError::new(LexErrorKind::MalformedCharConstant, 1)]
        );
    }

    #[test]
    fn bare_equals_and_bang() {
        let err = tokenize("a = b").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidEquals);
        let err = tokenize("!x").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidBang);
        assert_eq!(
            kinds("== !="),
            [TokenKind::Equal, TokenKind::NotEqual, TokenKind::EndOfInput]
        );
    }

    #[test]
    fn invalid_character_reports_code() {
        let err = tokenize("@").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::InvalidCharacter(b'@'));
        assert_eq!(err.to_string(), "invalid character '@' (code 64) at line 1");
    }

    #[test]
    fn long_identifier_warns_once() {
        let name = "a".repeat(300);
        let (tokens, diagnostics) = tokenize_all(&name);
        assert_eq!(tokens[0].text().map(str::len), Some(MAX_LEXEME_LEN));
        assert_eq!(tokens[1].kind(), TokenKind::EndOfInput);
        assert_eq!(
            diagnostics,
            [LexError::new(LexErrorKind::IdentifierTruncated, 1)]
        );
        assert!(diagnostics[0].is_warning());
    }

    #[test]
    fn long_string_truncates_silently() {
        let input = format!("\"{}\"", "s".repeat(400));
        let (tokens, diagnostics) = tokenize_all(&input);
        assert_eq!(tokens[0].text().map(str::len), Some(MAX_LEXEME_LEN));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn integer_overflow() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::IntegerOutOfRange);
    }

    #[test]
    fn truncation_table() {
        assert_eq!(truncation_policy(LexemeClass::Identifier), Truncation::Warn);
        assert_eq!(truncation_policy(LexemeClass::Number), Truncation::Silent);
        assert_eq!(truncation_policy(LexemeClass::String), Truncation::Silent);
    }

    #[test]
    fn close_is_idempotent() {
        let mut scanner = Scanner::from_text("a\nb");
        scanner.next_token();
        scanner.close();
        scanner.close();
        assert!(scanner.is_closed());
        assert_eq!(scanner.next_token().kind(), TokenKind::EndOfInput);
    }

    #[test]
    fn iterator_stops_after_end_of_input() {
        let scanner = Scanner::from_text("a b");
        let tokens: Vec<_> = scanner.collect();
        assert_eq!(tokens.len(), 3);
    }
}
