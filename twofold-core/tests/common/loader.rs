//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;

use twofold_core::{Param, Token, TokenKind};

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub input: String,
    pub tokens: Vec<ExpectedToken>,
}

/// Expected token as written in a fixture
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedToken {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub params: Vec<(String, String)>,
}

impl ExpectedToken {
    pub fn to_token(&self) -> Token {
        let kind = match self.kind.as_str() {
            "raw_text" => TokenKind::RawText,
            "single_tag" => TokenKind::SingleTag,
            "double_tag" => TokenKind::DoubleTag,
            other => panic!("unknown token type {:?}", other),
        };
        let mut token = Token::tag(kind, &self.name, self.start, self.end);
        token.params = self
            .params
            .iter()
            .map(|(key, value)| Param::new(key, value.as_str()))
            .collect();
        token
    }
}

impl TestCase {
    pub fn expected(&self) -> Vec<Token> {
        self.tokens.iter().map(ExpectedToken::to_token).collect()
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_mixed() {
        let cases = load_fixtures_by_name("mixed");
        assert!(!cases.is_empty());
        assert!(cases.iter().any(|c| c.id == "raw_then_single"));
    }
}
