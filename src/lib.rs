//! Lexical analyzer for LPD, a small Pascal-like teaching language.
//!
//! Turns source text into classified tokens, each tagged with the
//! line it starts on. Lexical errors are reported as tokens so the
//! caller decides whether to keep scanning.
//!
//! # Quick start
//!
//! ## Tokenize a string
//!
//! ```
//! use lpd_lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("x <- 10;\n").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Identifier,
//!         TokenKind::Assign,
//!         TokenKind::IntegerConstant,
//!         TokenKind::Semicolon,
//!         TokenKind::EndOfInput,
//!     ]
//! );
//! ```
//!
//! ## Pull tokens one at a time
//!
//! ```
//! use lpd_lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::from_text("prg demo; = end");
//! loop {
//!     let token = scanner.next_token();
//!     if token.is_terminal() {
//!         assert_eq!(token.kind(), TokenKind::LexicalError);
//!         break;
//!     }
//! }
//! assert_eq!(scanner.diagnostics().len(), 1);
//! scanner.close();
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use std::io;
use std::path::{Path, PathBuf};

pub mod formatter;
pub mod keywords;
pub mod lexer;
mod source;
pub mod token;

pub use formatter::{format_token, format_tokens};
pub use lexer::{LexError, LexErrorKind, MAX_LEXEME_LEN, Scanner, tokenize, tokenize_all};
pub use token::{PayloadKind, Token, TokenKind, Value};

/// Errors that stop a scan as a whole.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A lexical error, when the caller stops at the first one.
    #[error("{0}")]
    Lex(#[from] LexError),
}

/// Open a file and tokenize it, stopping at the first lexical error.
pub fn tokenize_file(path: impl AsRef<Path>) -> Result<Vec<Token>, Error> {
    let mut scanner = Scanner::open(path)?;
    let mut tokens = Vec::new();
    loop {
        let token = scanner.try_next_token()?;
        let done = token.kind() == TokenKind::EndOfInput;
        tokens.push(token);
        if done {
            scanner.close();
            return Ok(tokens);
        }
    }
}
