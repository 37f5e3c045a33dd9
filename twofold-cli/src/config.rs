//! Optional TOML configuration.
//!
//! Looked up at `$TWOFOLD_CONFIG`, else `twofold.toml` in the working
//! directory. A missing default file means default settings; a missing file
//! named by the environment is an error.
//!
//! ```toml
//! [lexer]
//! open_tag = "<"
//! close_tag = ">"
//! last_stopper = "/"
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;
use twofold_core::LexerConfig;

pub const CONFIG_ENV: &str = "TWOFOLD_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "twofold.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub lexer: LexerSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexerSection {
    pub open_tag: String,
    pub close_tag: String,
    pub last_stopper: String,
}

impl Default for LexerSection {
    fn default() -> Self {
        let defaults = LexerConfig::default();
        Self {
            open_tag: defaults.open_tag().to_string(),
            close_tag: defaults.close_tag().to_string(),
            last_stopper: defaults.last_stopper().to_string(),
        }
    }
}

impl FileConfig {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid TOML")
    }

    pub fn lexer_config(&self) -> anyhow::Result<LexerConfig> {
        let section = &self.lexer;
        Ok(LexerConfig::from_strs(
            &section.open_tag,
            &section.close_tag,
            &section.last_stopper,
        )?)
    }
}

/// Resolve and load the configuration for this process.
pub fn load() -> anyhow::Result<LexerConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_from(&PathBuf::from(path), true),
        None => load_from(Path::new(DEFAULT_CONFIG_FILE), false),
    }
}

pub fn load_from(path: &Path, required: bool) -> anyhow::Result<LexerConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound && !required => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(LexerConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let config = FileConfig::parse(&text)
        .and_then(|file| file.lexer_config())
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}
