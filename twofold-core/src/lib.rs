//! TwoFold Core Lexer
//!
//! Incremental, Unicode-aware lexer for a tag-based template language.
//! Turns a stream of codepoints into a flat list of [`Token`]s: raw-text runs,
//! self-closing tags (`<name k='v'/>`) and either half of a paired tag
//! (`<name>` / `</name>`). Nesting is not checked; that is a parser's job.
//!
//! Malformed markup is never an error. A tag that stops making sense partway
//! through becomes raw text, and adjacent raw text is merged, so the token
//! spans always tile the input.
//!
//! # Architecture
//!
//! - **classify.rs** - Codepoint predicates (names, spaces, quotes)
//! - **name.rs** - Bounded inline codepoint sequence for names and keys
//! - **token.rs** - Token, Param and their accumulator operations
//! - **lexer.rs** - The state machine, commit protocol and chunk drivers
//! - **streaming.rs** - UTF-8 decoding of byte chunks, reader driver
//! - **config.rs** - Open tag, close tag and stopper characters
//! - **span.rs** - Codepoint spans
//!
//! # Example
//!
//! ```
//! use twofold_core::{Lexer, TokenKind};
//!
//! let tokens = Lexer::lex("hi <b x='1'/>").unwrap();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[1].kind, TokenKind::SingleTag);
//! assert_eq!(tokens[1].name, "b");
//! assert_eq!(tokens[1].param("x").map(|p| p.inner()), Some("1"));
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod lexer;
pub mod name;
pub mod span;
pub mod streaming;
pub mod token;

pub use config::LexerConfig;
pub use error::{ConfigError, LexError, LexFailure};
pub use lexer::{Lexer, State};
pub use name::{Name, MAX_NAME_LEN};
pub use span::Span;
pub use streaming::{lex_reader, FeedResult, Utf8Decoder};
pub use token::{Delimiter, Param, Token, TokenKind};
