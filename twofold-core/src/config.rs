//! Lexer configuration: the three structural characters of a tag.
//!
//! With the defaults a single tag reads `<name />` and a double tag
//! `<name>...</name>`. Changing `open_tag`/`close_tag` to `{`/`}` gives
//! `{name /}`; changing `last_stopper` to `?` gives `<name ?>` and
//! `<name>...<?name>`.

use crate::error::ConfigError;

/// Characters accepted as `last_stopper`.
pub const ALLOWED_STOPPERS: [char; 4] = ['/', '?', '!', '#'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "UncheckedConfig")
)]
pub struct LexerConfig {
    open_tag: char,
    close_tag: char,
    last_stopper: char,
}

impl LexerConfig {
    /// Build a validated configuration.
    pub fn new(open_tag: char, close_tag: char, last_stopper: char) -> Result<Self, ConfigError> {
        let config = Self {
            open_tag,
            close_tag,
            last_stopper,
        };
        config.validate()?;
        Ok(config)
    }

    /// Build from string settings, each of which must be a single character.
    pub fn from_strs(open_tag: &str, close_tag: &str, last_stopper: &str) -> Result<Self, ConfigError> {
        Self::new(
            single_char("open_tag", open_tag)?,
            single_char("close_tag", close_tag)?,
            single_char("last_stopper", last_stopper)?,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.close_tag == self.last_stopper {
            return Err(ConfigError::CloseTagIsStopper(self.close_tag));
        }
        if !ALLOWED_STOPPERS.contains(&self.last_stopper) {
            return Err(ConfigError::StopperNotAllowed(self.last_stopper));
        }
        Ok(())
    }

    #[inline]
    pub fn open_tag(&self) -> char {
        self.open_tag
    }

    #[inline]
    pub fn close_tag(&self) -> char {
        self.close_tag
    }

    #[inline]
    pub fn last_stopper(&self) -> char {
        self.last_stopper
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            open_tag: '<',
            close_tag: '>',
            last_stopper: '/',
        }
    }
}

/// Deserialized fields, validated on conversion.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedConfig {
    open_tag: char,
    close_tag: char,
    last_stopper: char,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedConfig> for LexerConfig {
    type Error = ConfigError;

    fn try_from(raw: UncheckedConfig) -> Result<Self, Self::Error> {
        Self::new(raw.open_tag, raw.close_tag, raw.last_stopper)
    }
}

fn single_char(field: &'static str, value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::NotOneChar {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LexerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.open_tag(), '<');
        assert_eq!(config.close_tag(), '>');
        assert_eq!(config.last_stopper(), '/');
    }

    #[test]
    fn test_custom_config() {
        let config = LexerConfig::new('{', '}', '?').unwrap();
        assert_eq!(config.open_tag(), '{');
        assert_eq!(config.last_stopper(), '?');
    }

    #[test]
    fn test_close_tag_cannot_be_stopper() {
        assert_eq!(
            LexerConfig::new('<', '/', '/'),
            Err(ConfigError::CloseTagIsStopper('/'))
        );
    }

    #[test]
    fn test_stopper_must_be_allowed() {
        assert_eq!(
            LexerConfig::new('<', '>', '%'),
            Err(ConfigError::StopperNotAllowed('%'))
        );
        for stopper in ALLOWED_STOPPERS {
            assert!(LexerConfig::new('<', '>', stopper).is_ok());
        }
    }

    #[test]
    fn test_from_strs() {
        assert_eq!(LexerConfig::from_strs("<", ">", "/"), Ok(LexerConfig::default()));
        assert_eq!(
            LexerConfig::from_strs("<<", ">", "/"),
            Err(ConfigError::NotOneChar {
                field: "open_tag",
                value: "<<".to_string()
            })
        );
        assert!(matches!(
            LexerConfig::from_strs("<", "", "/"),
            Err(ConfigError::NotOneChar { field: "close_tag", .. })
        ));
    }
}
