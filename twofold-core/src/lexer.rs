//! The lexer state machine.
//!
//! [`Lexer`] consumes one codepoint at a time and never rejects input:
//! anything that does not fit the current state demotes the token being built
//! to raw text. Input may arrive in any number of chunks; all cursor and state
//! bookkeeping lives on the lexer, so chunk boundaries are invisible in the
//! output.
//!
//! ```text
//!            open                name-start             space
//! RawText ─────────▶ OpenTag ─────────────▶ TagName ─────────▶ InsideTag ◀──┐
//!    ▲                                         │                  │  │      │
//!    │   close (commit)                 stop   │      name-start  │  │ quote│
//!    ├─────────────────────────────────────────┼──────────────────┘  │ or { │
//!    │                                         ▼                     ▼      │
//!    │   close after stop (commit)         CloseTag      ParamName ─▶ Equal │
//!    └─────────────────────────────────────────┘                     │      │
//!                                                                    ▼      │
//!                                                          ParamValue ──────┘
//! ```

use std::collections::TryReserveError;
use std::mem;

use memchr::memmem;
use tracing::{debug, error, trace, warn};

use crate::classify::{is_name_continue, is_name_start, is_newline, is_space, is_value_delimiter, EXPR_CLOSE};
use crate::config::LexerConfig;
use crate::error::{LexError, LexFailure};
use crate::streaming::FeedResult;
use crate::token::{Delimiter, Param, Token, TokenKind, POSITIONAL_KEY};

/// Capacity of the processed token list on first growth; doubled afterwards.
pub const PROCESSED_INITIAL_CAPACITY: usize = 96;

/// Codepoint assumed to precede the first one fed.
const START_PREV: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    RawText,
    OpenTag,
    CloseTag,
    TagName,
    InsideTag,
    ParamName,
    Equal,
    ParamValue,
    /// Terminal. Reached through [`Lexer::finish`].
    Final,
}

/// A failed buffer growth, kept until `reset`.
#[derive(Debug, Clone)]
struct Fault {
    what: &'static str,
    source: TryReserveError,
}

impl Fault {
    fn to_error(&self) -> LexError {
        LexError::Capacity {
            what: self.what,
            source: self.source.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lexer {
    config: LexerConfig,
    index: usize,
    state: State,
    prior_state: State,
    prev: char,
    pending: Token,
    pending_param: Param,
    processed: Vec<Token>,
    fault: Option<Fault>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self::with_config(LexerConfig::default())
    }

    pub fn with_config(config: LexerConfig) -> Self {
        Self {
            config,
            index: 0,
            state: State::RawText,
            prior_state: State::RawText,
            prev: START_PREV,
            pending: Token::at(0),
            pending_param: Param::default(),
            processed: Vec::new(),
            fault: None,
        }
    }

    /// Lex a complete text with the default configuration.
    ///
    /// On failure the tokens committed so far travel with the error.
    pub fn lex(text: &str) -> Result<Vec<Token>, LexFailure> {
        let mut lexer = Self::new();
        let outcome = lexer.run(text);
        lexer.conclude(outcome)
    }

    fn run(&mut self, text: &str) -> Result<(), LexError> {
        self.process_str(text)?;
        self.finish()?;
        Ok(())
    }

    /// Hand over the processed list, attaching it to the error if `outcome`
    /// failed.
    pub(crate) fn conclude(self, outcome: Result<(), LexError>) -> Result<Vec<Token>, LexFailure> {
        match outcome {
            Ok(()) => Ok(self.processed),
            Err(error) => Err(LexFailure {
                tokens: self.processed,
                error,
            }),
        }
    }

    #[inline]
    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    /// Number of codepoints consumed so far.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// State before the most recent transition.
    #[inline]
    pub fn prior_state(&self) -> State {
        self.prior_state
    }

    /// Tokens committed so far. The last raw-text entry may still grow.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.processed
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.processed
    }

    /// Return to the initial state, keeping the processed list's allocation.
    pub fn reset(&mut self) {
        self.index = 0;
        self.state = State::RawText;
        self.prior_state = State::RawText;
        self.prev = START_PREV;
        self.pending.reset_at(0);
        self.pending_param.clear();
        self.processed.clear();
        self.fault = None;
        debug!("lexer reset");
    }

    // ---- drivers ----

    /// Feed a slice of codepoints.
    ///
    /// Stops early and returns the error if a buffer fails to grow; tokens
    /// committed before that point stay available through [`Lexer::tokens`].
    pub fn process_chunk(&mut self, chunk: &[char]) -> Result<FeedResult, LexError> {
        self.ensure_live()?;
        let tokens_before = self.processed.len();
        for &c in chunk {
            self.consume(c, self.prev);
            if let Some(fault) = &self.fault {
                return Err(fault.to_error());
            }
        }
        Ok(FeedResult {
            codepoints_consumed: chunk.len(),
            tokens_added: self.processed.len() - tokens_before,
        })
    }

    /// Feed UTF-8 text. Equivalent to [`Lexer::process_chunk`] over
    /// `text.chars()`, but skips raw text with a substring search for the
    /// open-tag character.
    pub fn process_str(&mut self, text: &str) -> Result<FeedResult, LexError> {
        self.ensure_live()?;
        let tokens_before = self.processed.len();
        let mut needle = [0u8; 4];
        let needle = self.config.open_tag().encode_utf8(&mut needle);
        let finder = memmem::Finder::new(needle.as_bytes());

        let mut consumed = 0;
        let mut rest = text;
        while !rest.is_empty() {
            if self.state == State::RawText {
                let skip = finder.find(rest.as_bytes()).unwrap_or(rest.len());
                if skip > 0 {
                    let (raw, tail) = rest.split_at(skip);
                    consumed += self.skip_raw(raw);
                    rest = tail;
                    continue;
                }
            }
            let mut chars = rest.chars();
            let Some(c) = chars.next() else {
                break;
            };
            self.consume(c, self.prev);
            consumed += 1;
            rest = chars.as_str();
            if let Some(fault) = &self.fault {
                return Err(fault.to_error());
            }
        }
        Ok(FeedResult {
            codepoints_consumed: consumed,
            tokens_added: self.processed.len() - tokens_before,
        })
    }

    /// Close out the input and return every token.
    ///
    /// Whatever is still pending becomes raw text. Afterwards the lexer is in
    /// [`State::Final`] and rejects further input until [`Lexer::reset`].
    pub fn finish(&mut self) -> Result<&[Token], LexError> {
        self.ensure_live()?;
        if let Some(last) = self.processed.last_mut().filter(|t| t.is_raw_text()) {
            last.pos_end = self.index;
        } else if !self.pending.span().is_empty() {
            self.pending.make_raw();
            self.pending.pos_end = self.index;
            if let Err(source) = self.reserve_processed() {
                error!(index = self.index, %source, "failed to grow processed token list");
                return Err(LexError::Capacity {
                    what: "processed token list",
                    source,
                });
            }
            let end = self.index;
            self.processed.push(mem::replace(&mut self.pending, Token::at(end)));
        }
        self.pending.reset_at(self.index);
        self.pending_param.clear();
        self.transition(State::Final);
        debug!(index = self.index, tokens = self.processed.len(), "lexer finished");
        Ok(&self.processed)
    }

    fn ensure_live(&self) -> Result<(), LexError> {
        if self.state == State::Final {
            warn!(index = self.index, "input after finish");
            return Err(LexError::Finished);
        }
        if let Some(fault) = &self.fault {
            return Err(fault.to_error());
        }
        Ok(())
    }

    /// Advance over text known to hold no open-tag character while in
    /// [`State::RawText`].
    fn skip_raw(&mut self, raw: &str) -> usize {
        let mut count = 0;
        let mut last = None;
        for c in raw.chars() {
            count += 1;
            last = Some(c);
        }
        if let Some(c) = last {
            self.prev = c;
            self.index += count;
            self.pending.pos_end = self.index;
        }
        count
    }

    // ---- state machine ----

    /// Consume one codepoint. `prev` is the codepoint before it.
    ///
    /// Never fails: malformed markup degrades to raw text. A buffer that
    /// cannot grow is recorded and reported by the next driver call, and
    /// further codepoints are ignored until [`Lexer::reset`].
    pub fn consume(&mut self, curr: char, prev: char) {
        if self.state == State::Final {
            warn!(index = self.index, "input after finish");
            return;
        }
        if self.fault.is_some() {
            return;
        }
        self.pending.pos_end = self.index;
        match self.state {
            State::RawText => self.raw_text(curr),
            State::OpenTag => self.open_tag(curr, prev),
            State::CloseTag => self.close_tag(curr, prev),
            State::TagName => self.tag_name(curr),
            State::InsideTag => self.inside_tag(curr, prev),
            State::ParamName => self.param_name(curr),
            State::Equal => self.equal(curr),
            State::ParamValue => self.param_value(curr),
            State::Final => {}
        }
        self.prev = curr;
        self.index += 1;
        self.pending.pos_end = self.index;
    }

    fn raw_text(&mut self, curr: char) {
        if curr == self.config.open_tag() {
            self.commit();
            self.transition(State::OpenTag);
        }
    }

    fn open_tag(&mut self, curr: char, prev: char) {
        if is_name_start(curr) {
            self.pending.name.push(curr);
            self.pending.kind = TokenKind::SingleTag;
            self.transition(State::TagName);
        } else if curr == self.config.last_stopper() && self.pending.name.is_empty() {
            self.pending.kind = TokenKind::DoubleTag;
        } else if self.pending.name.is_empty() && is_space(curr) && !is_space(prev) {
            // one space after the open tag is tolerated
        } else if curr == self.config.open_tag() {
            // false start
        } else {
            self.abandon();
        }
    }

    fn close_tag(&mut self, curr: char, prev: char) {
        if curr == self.config.close_tag() && prev == self.config.last_stopper() {
            self.pending.kind = TokenKind::SingleTag;
            self.pending.pos_end += 1;
            self.commit();
            self.transition(State::RawText);
        } else {
            self.abandon();
        }
    }

    fn tag_name(&mut self, curr: char) {
        if is_name_continue(curr) && !self.pending.name.is_full() {
            self.pending.name.push(curr);
        } else if is_space(curr) {
            self.transition(State::InsideTag);
        } else if curr == self.config.last_stopper() && !self.pending.name.is_empty() {
            self.pending.kind = TokenKind::SingleTag;
            self.transition(State::CloseTag);
        } else if curr == self.config.close_tag() {
            self.close_double();
        } else {
            self.abandon();
        }
    }

    fn inside_tag(&mut self, curr: char, prev: char) {
        let named = !self.pending.name.is_empty();
        if curr == self.config.last_stopper() && named {
            self.pending.kind = TokenKind::SingleTag;
            self.transition(State::CloseTag);
        } else if curr == self.config.close_tag() && named {
            self.close_double();
        } else if self.pending.params.is_empty() && is_value_delimiter(curr) {
            self.pending_param.key.clear();
            self.pending_param.key.push(POSITIONAL_KEY);
            if self.push_value(curr) {
                self.transition(State::ParamValue);
            }
        } else if is_name_start(curr) {
            self.pending_param.key.push(curr);
            self.transition(State::ParamName);
        } else if is_space(curr) && !is_space(prev) {
            // single separator
        } else {
            self.abandon();
        }
    }

    fn param_name(&mut self, curr: char) {
        if is_name_continue(curr) && !self.pending_param.key.is_full() {
            self.pending_param.key.push(curr);
        } else if curr == '=' {
            self.transition(State::Equal);
        } else {
            self.abandon();
        }
    }

    fn equal(&mut self, curr: char) {
        if curr == self.config.close_tag()
            || curr == self.config.last_stopper()
            || is_space(curr)
            || is_newline(curr)
        {
            // key without a value
            self.abandon();
        } else if self.push_value(curr) {
            self.transition(State::ParamValue);
        }
    }

    fn param_value(&mut self, curr: char) {
        let delimiter = self.pending_param.delimiter();
        let delimited = delimiter != Delimiter::Bare;

        if is_newline(curr) && !delimiter.allows_newline() {
            self.abandon();
        } else if delimited
            && Some(curr) == delimiter.closer()
            && self.pending_param.is_positional()
            && self.pending_param.is_only_opener()
        {
            // empty positional value
            self.abandon();
        } else if delimiter == Delimiter::Quote(curr) && !self.pending_param.value.ends_with('\\') {
            self.commit_param(Some(curr));
            self.transition(State::InsideTag);
        } else if delimiter == Delimiter::Brace && curr == EXPR_CLOSE {
            self.commit_param(Some(curr));
            self.transition(State::InsideTag);
        } else if !delimited && curr == self.config.last_stopper() {
            self.pending.kind = TokenKind::SingleTag;
            self.commit_param(None);
            self.transition(State::CloseTag);
        } else if !delimited && curr == self.config.close_tag() {
            self.pending.kind = TokenKind::DoubleTag;
            self.pending.pos_end += 1;
            self.commit_param(None);
            self.commit();
            self.transition(State::RawText);
        } else if !delimited && is_space(curr) {
            self.commit_param(None);
            self.transition(State::InsideTag);
        } else {
            self.push_value(curr);
        }
    }

    /// Close tag reached on a tag with no stopper: `<name ...>`.
    fn close_double(&mut self) {
        self.pending.kind = TokenKind::DoubleTag;
        self.pending.pos_end += 1;
        self.commit();
        self.transition(State::RawText);
    }

    #[inline]
    fn transition(&mut self, to: State) {
        trace!(from = ?self.state, ?to, index = self.index, "transition");
        self.prior_state = self.state;
        self.state = to;
    }

    /// Drop the tag being built; its span continues as raw text.
    fn abandon(&mut self) {
        trace!(index = self.index, state = ?self.state, "abandon tag");
        self.pending_param.clear();
        self.pending.make_raw();
        self.transition(State::RawText);
    }

    // ---- commit protocol ----

    /// Move the pending token into the processed list.
    fn commit(&mut self) {
        let pending = &mut self.pending;
        if pending.is_raw_text() && pending.span().is_empty() {
            return;
        }
        if pending.name.is_empty() {
            pending.make_raw();
        }
        let end = pending.pos_end;

        if pending.is_raw_text() {
            if let Some(last) = self.processed.last_mut().filter(|t| t.is_raw_text()) {
                debug!(start = last.pos_start, end, "merge raw text");
                last.pos_end = end;
                self.pending.reset_at(end);
                return;
            }
        }

        if let Err(source) = self.reserve_processed() {
            self.fail("processed token list", source);
            return;
        }
        let token = mem::replace(&mut self.pending, Token::at(end));
        debug!(kind = %token.kind, name = %token.name, start = token.pos_start, end, "commit token");
        self.processed.push(token);
    }

    /// Attach the pending param to the pending token, first appending the
    /// closing delimiter if there is one.
    fn commit_param(&mut self, closing: Option<char>) {
        if let Some(c) = closing {
            if !self.push_value(c) {
                return;
            }
        }
        let param = mem::take(&mut self.pending_param);
        if let Err(source) = self.pending.try_push_param(param) {
            self.fail("parameter list", source);
        }
    }

    fn push_value(&mut self, c: char) -> bool {
        match self.pending_param.value.try_reserve(c.len_utf8()) {
            Ok(()) => {
                self.pending_param.value.push(c);
                true
            }
            Err(source) => {
                self.fail("parameter value", source);
                false
            }
        }
    }

    fn reserve_processed(&mut self) -> Result<(), TryReserveError> {
        if self.processed.len() == self.processed.capacity() {
            let additional = self.processed.capacity().max(PROCESSED_INITIAL_CAPACITY);
            self.processed.try_reserve_exact(additional)?;
        }
        Ok(())
    }

    fn fail(&mut self, what: &'static str, source: TryReserveError) {
        error!(index = self.index, %source, "failed to grow {}", what);
        self.fault = Some(Fault { what, source });
    }
}
