//! Codepoint classification for the lexer.
//!
//! Pure predicates consulted on every codepoint. Name tables cover ASCII plus
//! the Latin-1 Supplement letters, the Greek block and the basic Cyrillic
//! alphabet. Nothing here allocates or looks at neighbouring codepoints.

/// Opening delimiter of an expression value: `{...}`.
pub const EXPR_OPEN: char = '{';

/// Closing delimiter of an expression value.
pub const EXPR_CLOSE: char = '}';

/// Horizontal whitespace: space, tab, form feed, vertical tab.
#[inline]
pub const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0C}' | '\u{0B}')
}

/// Line breaks: `\n` and `\r`.
#[inline]
pub const fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// String delimiters: single quote, double quote and backtick.
#[inline]
pub const fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

/// Characters that may open a delimited parameter value.
#[inline]
pub const fn is_value_delimiter(c: char) -> bool {
    is_quote(c) || c == EXPR_OPEN
}

/// First character of a tag or parameter name.
///
/// Lowercase only: `a-z`, `à-ÿ`, `ά-ώ`, `а-я`. Digits, uppercase letters and
/// underscore are rejected here but accepted by [`is_name_continue`].
#[inline]
pub const fn is_name_start(c: char) -> bool {
    matches!(c,
        'a'..='z'
        | '\u{E0}'..='\u{FF}'
        | '\u{3AC}'..='\u{3CE}'
        | '\u{430}'..='\u{44F}'
    )
}

/// Any character after the first in a tag or parameter name.
///
/// `0-9`, `A-Z`, `a-z`, `_`, `À-ÿ`, `Έ-ώ`, `А-я`.
#[inline]
pub const fn is_name_continue(c: char) -> bool {
    matches!(c,
        '0'..='9'
        | 'A'..='Z'
        | 'a'..='z'
        | '_'
        | '\u{C0}'..='\u{FF}'
        | '\u{388}'..='\u{3CE}'
        | '\u{410}'..='\u{44F}'
    )
}
