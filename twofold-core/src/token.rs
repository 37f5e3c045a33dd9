//! Token and parameter model.
//!
//! A [`Token`] is either a run of raw text or a tag. Tags carry a [`Name`]
//! and an ordered list of [`Param`]s. The lexer builds one pending token and
//! one pending param at a time and moves them into their owning collections
//! on commit.

use std::collections::TryReserveError;
use std::fmt;

use crate::classify::{is_quote, EXPR_CLOSE, EXPR_OPEN};
use crate::name::Name;
use crate::span::Span;

/// Capacity of a tag's parameter list on first growth; doubled afterwards.
pub const PARAMS_INITIAL_CAPACITY: usize = 4;

/// Key of the positional parameter.
pub const POSITIONAL_KEY: char = '0';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum TokenKind {
    #[default]
    RawText,
    /// Self-closing tag: `<name ... />`.
    SingleTag,
    /// Either half of a paired tag: `<name ...>` or `</name>`.
    DoubleTag,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RawText => "raw_text",
            Self::SingleTag => "single_tag",
            Self::DoubleTag => "double_tag",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a parameter value is delimited, judged by its first codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Undelimited value, ended by a space, the stopper or the close tag.
    Bare,
    /// `'...'`, `"..."` or `` `...` ``.
    Quote(char),
    /// `{...}` expression, captured verbatim.
    Brace,
}

impl Delimiter {
    /// Codepoint that terminates a value opened with this delimiter.
    pub fn closer(self) -> Option<char> {
        match self {
            Self::Bare => None,
            Self::Quote(q) => Some(q),
            Self::Brace => Some(EXPR_CLOSE),
        }
    }

    /// Whether newlines may appear inside the value.
    pub fn allows_newline(self) -> bool {
        matches!(self, Self::Quote('`') | Self::Brace)
    }
}

/// A `key=value` pair, or a positional value stored under key `0`.
///
/// `value` is kept verbatim, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Param {
    pub key: Name,
    pub value: String,
}

impl Param {
    pub fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: Name::truncating(key),
            value: value.into(),
        }
    }

    #[inline]
    pub fn is_positional(&self) -> bool {
        self.key.is_char(POSITIONAL_KEY)
    }

    pub fn delimiter(&self) -> Delimiter {
        match self.value.chars().next() {
            Some(EXPR_OPEN) => Delimiter::Brace,
            Some(q) if is_quote(q) => Delimiter::Quote(q),
            _ => Delimiter::Bare,
        }
    }

    /// The value with its delimiters stripped.
    pub fn inner(&self) -> &str {
        let delimiter = self.delimiter();
        let Some(closer) = delimiter.closer() else {
            return &self.value;
        };
        let mut chars = self.value.chars();
        chars.next();
        let rest = chars.as_str();
        rest.strip_suffix(closer).unwrap_or(rest)
    }

    /// True while the value holds nothing but its opening delimiter.
    #[inline]
    pub(crate) fn is_only_opener(&self) -> bool {
        let mut chars = self.value.chars();
        chars.next().is_some() && chars.next().is_none()
    }

    pub fn clear(&mut self) {
        self.key.clear();
        self.value.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: TokenKind,
    pub pos_start: usize,
    pub pos_end: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Name::is_empty"))]
    pub name: Name,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub params: Vec<Param>,
}

impl Token {
    /// Empty raw-text token starting and ending at `pos`.
    pub fn at(pos: usize) -> Self {
        Self {
            pos_start: pos,
            pos_end: pos,
            ..Self::default()
        }
    }

    pub fn raw(pos_start: usize, pos_end: usize) -> Self {
        Self {
            pos_start,
            pos_end,
            ..Self::default()
        }
    }

    pub fn tag(kind: TokenKind, name: &str, pos_start: usize, pos_end: usize) -> Self {
        Self {
            kind,
            name: Name::truncating(name),
            pos_start,
            pos_end,
            params: Vec::new(),
        }
    }

    /// Builder-style helper, mostly for tests.
    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push(Param::new(key, value));
        self
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.pos_start, self.pos_end)
    }

    #[inline]
    pub fn is_raw_text(&self) -> bool {
        self.kind == TokenKind::RawText
    }

    #[inline]
    pub fn is_tag(&self) -> bool {
        !self.is_raw_text()
    }

    /// Demote to raw text, keeping the span.
    pub fn make_raw(&mut self) {
        self.kind = TokenKind::RawText;
        self.name.clear();
        self.params.clear();
    }

    /// Reinitialize in place as an empty raw-text token at `pos`. The
    /// parameter list keeps its allocation.
    pub fn reset_at(&mut self, pos: usize) {
        self.make_raw();
        self.pos_start = pos;
        self.pos_end = pos;
    }

    /// Append a parameter, doubling the list's capacity when full.
    pub fn try_push_param(&mut self, param: Param) -> Result<(), TryReserveError> {
        if self.params.len() == self.params.capacity() {
            let additional = self.params.capacity().max(PARAMS_INITIAL_CAPACITY);
            self.params.try_reserve_exact(additional)?;
        }
        self.params.push(param);
        Ok(())
    }

    /// First parameter with the given key.
    pub fn param(&self, key: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.key == key)
    }

    pub fn positional(&self) -> Option<&Param> {
        self.params.first().filter(|p| p.is_positional())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{},{})", self.kind, self.pos_start, self.pos_end)?;
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        for param in &self.params {
            write!(f, " {}={}", param.key, param.value)?;
        }
        Ok(())
    }
}
