//! Bounded codepoint sequence for tag names and parameter keys.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum number of codepoints in a tag name or parameter key.
pub const MAX_NAME_LEN: usize = 42;

/// A tag name or parameter key.
///
/// Stored inline as at most [`MAX_NAME_LEN`] codepoints, so names never
/// allocate and copying a token does not chase pointers. Pushing past the
/// limit is refused rather than silently growing.
#[derive(Clone, Copy)]
pub struct Name {
    chars: [char; MAX_NAME_LEN],
    len: u8,
}

impl Name {
    /// Create an empty name.
    pub const fn new() -> Self {
        Self {
            chars: ['\0'; MAX_NAME_LEN],
            len: 0,
        }
    }

    /// Build a name from text, keeping at most [`MAX_NAME_LEN`] codepoints.
    pub fn truncating(text: &str) -> Self {
        let mut name = Self::new();
        for c in text.chars() {
            if !name.push(c) {
                break;
            }
        }
        name
    }

    /// Append a codepoint. Returns `false` (and leaves the name untouched)
    /// when the name is already full.
    #[inline]
    pub fn push(&mut self, c: char) -> bool {
        if self.is_full() {
            return false;
        }
        self.chars[self.len as usize] = c;
        self.len += 1;
        true
    }

    /// Number of codepoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == MAX_NAME_LEN
    }

    #[inline]
    pub fn first(&self) -> Option<char> {
        self.as_chars().first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<char> {
        self.as_chars().last().copied()
    }

    /// The stored codepoints.
    #[inline]
    pub fn as_chars(&self) -> &[char] {
        &self.chars[..self.len()]
    }

    /// Forget all codepoints, keeping the inline storage.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// True when the name is exactly `c`.
    #[inline]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.as_chars(), [only] if *only == c)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        self.as_chars().iter().try_for_each(|&c| f.write_char(c))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string())
    }
}

// Only the live prefix takes part in equality; `clear` leaves stale codepoints
// behind in the buffer.
impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.as_chars() == other.as_chars()
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_chars().hash(state);
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_chars().iter().copied().eq(other.chars())
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Name {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
