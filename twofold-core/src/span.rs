//! Codepoint spans.

/// Half-open range `[start, end)` of codepoint offsets into the lexed input.
///
/// Offsets count Unicode scalar values, not bytes. Use [`Span::slice`] to
/// map a span back onto UTF-8 source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of codepoints covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Resolve the span against the source it was produced from.
    ///
    /// Returns `None` when the span reaches past the end of `source`.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        if self.start > self.end {
            return None;
        }
        let mut offsets = source
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(source.len()));
        let start = offsets.nth(self.start)?;
        let end = if self.is_empty() {
            start
        } else {
            offsets.nth(self.len() - 1)?
        };
        source.get(start..end)
    }
}
