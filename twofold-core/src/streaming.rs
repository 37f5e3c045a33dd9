//! Incremental input: UTF-8 decoding and byte-source lexing.
//!
//! The lexer itself consumes codepoints. This module turns arbitrary byte
//! chunks into codepoints for it:
//!
//! ```text
//! Byte chunks        Utf8Decoder           Lexer
//!     │                   │                  │
//!     │──decode(bytes)───▶│                  │
//!     │                   │──process_chunk──▶│
//!     │                   │  (chars)         │──commit──▶ tokens
//!     │──(eof)───────────▶│                  │
//!     │                   │──finish─────────▶│
//! ```
//!
//! A multi-byte sequence split across two chunks is carried over and decoded
//! with the next chunk. Invalid sequences become U+FFFD, which no lexer state
//! accepts as markup, so the surrounding tag degrades to raw text.

use std::io::{ErrorKind, Read};
use std::mem;

use tracing::{debug, warn};

use crate::config::LexerConfig;
use crate::error::{LexError, LexFailure};
use crate::lexer::Lexer;
use crate::token::Token;

/// Bytes requested from a reader per call.
pub const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Result of feeding one chunk to the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedResult {
    /// Number of codepoints consumed from the input
    pub codepoints_consumed: usize,
    /// Number of entries appended to the processed token list
    pub tokens_added: usize,
}

/// Stateful UTF-8 decoder for chunked byte input.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Incomplete sequence from the end of the previous chunk
    carry: Vec<u8>,
    /// Total bytes fed so far
    fed: u64,
    invalid: usize,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, appending codepoints to `out`.
    pub fn decode(&mut self, bytes: &[u8], out: &mut Vec<char>) {
        let start = self.fed - self.carry.len() as u64;
        self.fed += bytes.len() as u64;
        if self.carry.is_empty() {
            self.decode_from(start, bytes, out);
        } else {
            let mut joined = mem::take(&mut self.carry);
            joined.extend_from_slice(bytes);
            self.decode_from(start, &joined, out);
        }
    }

    /// Flush a dangling incomplete sequence as a single U+FFFD.
    pub fn finish(&mut self, out: &mut Vec<char>) {
        if !self.carry.is_empty() {
            let offset = self.fed - self.carry.len() as u64;
            self.replace(offset, out);
            self.carry.clear();
        }
    }

    /// Number of U+FFFD substitutions made so far.
    #[inline]
    pub fn invalid_sequences(&self) -> usize {
        self.invalid
    }

    fn decode_from(&mut self, start: u64, mut input: &[u8], out: &mut Vec<char>) {
        let mut offset = start;
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.extend(text.chars());
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    if let Ok(text) = std::str::from_utf8(&input[..valid]) {
                        out.extend(text.chars());
                    }
                    match err.error_len() {
                        Some(len) => {
                            self.replace(offset + valid as u64, out);
                            input = &input[valid + len..];
                            offset += (valid + len) as u64;
                        }
                        None => {
                            // truncated at the end of the chunk
                            self.carry.extend_from_slice(&input[valid..]);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn replace(&mut self, offset: u64, out: &mut Vec<char>) {
        warn!(offset, "invalid UTF-8 sequence replaced with U+FFFD");
        self.invalid += 1;
        out.push(char::REPLACEMENT_CHARACTER);
    }
}

/// Lex everything `reader` yields.
///
/// A read error or a buffer that cannot grow stops the lex; the tokens
/// committed up to that point are returned in the [`LexFailure`].
pub fn lex_reader<R: Read>(reader: R, config: LexerConfig) -> Result<Vec<Token>, LexFailure> {
    let mut lexer = Lexer::with_config(config);
    let outcome = feed_reader(&mut lexer, reader);
    lexer.conclude(outcome)
}

fn feed_reader<R: Read>(lexer: &mut Lexer, mut reader: R) -> Result<(), LexError> {
    let mut decoder = Utf8Decoder::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    let mut chars = Vec::with_capacity(READ_CHUNK_SIZE);

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        chars.clear();
        decoder.decode(&buf[..n], &mut chars);
        lexer.process_chunk(&chars)?;
    }
    chars.clear();
    decoder.finish(&mut chars);
    lexer.process_chunk(&chars)?;
    lexer.finish()?;

    debug!(
        codepoints = lexer.index(),
        invalid = decoder.invalid_sequences(),
        "lexed reader"
    );
    Ok(())
}
