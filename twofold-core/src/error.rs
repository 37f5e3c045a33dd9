//! Error types.
//!
//! Malformed markup is never an error: the lexer degrades it to raw text.
//! Errors here cover misuse, allocation failure, I/O on a byte source and
//! invalid configuration.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Error)]
pub enum LexError {
    /// Input was fed, or `finish` called, after the lexer reached its final
    /// state. Call `reset` to reuse the instance.
    #[error("lexer already finished; reset it before feeding more input")]
    Finished,

    /// A growable buffer could not be enlarged. Tokens committed before the
    /// failure are still available.
    #[error("failed to grow {what}")]
    Capacity {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to read input")]
    Io(#[from] std::io::Error),
}

/// A one-shot lex that stopped early, with every token committed before the
/// failure.
#[derive(Debug, Error)]
#[error("lexing stopped after {} committed tokens", .tokens.len())]
pub struct LexFailure {
    pub tokens: Vec<Token>,
    #[source]
    pub error: LexError,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be exactly one character, got {value:?}")]
    NotOneChar { field: &'static str, value: String },

    #[error("close tag must be different from the last stopper ({0:?})")]
    CloseTagIsStopper(char),

    #[error("last stopper must be one of / ? ! #, got {0:?}")]
    StopperNotAllowed(char),
}
