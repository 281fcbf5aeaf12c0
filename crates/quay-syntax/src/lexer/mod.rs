//! Lexical analysis for JavaScript-family source text.
//!
//! The lexer turns a source buffer into a stream of classified tokens,
//! skipping everything that can only produce false marker matches:
//! comments, string literals, template text, and regex literals.
//!
//! ## Structure
//!
//! - `scanner.rs` - Main `Scanner` struct that produces tokens
//! - `token.rs` - `Token`, `TokenKind`, and `Keyword` definitions
//!
//! ## Usage
//!
//! ```rust
//! use quay_syntax::lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("let x = 42;");
//!
//! loop {
//!     let token = scanner.next_token();
//!     if matches!(token.kind, TokenKind::Eof) {
//!         break;
//!     }
//!     println!("{:?}", token.kind);
//! }
//! ```

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Keyword, Span, Token, TokenKind};
