//! Test harness for running fixtures with stochastic variations

use crate::common::{Gen, TestCase};
use twofold_core::{Lexer, Token, TokenKind};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub variation: String,
}

/// One line per token, for readable diffs.
pub fn render(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(Token::to_string).collect()
}

/// Feed `input` split at the given codepoint offsets.
pub fn lex_in_chunks(input: &str, splits: &[usize]) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut lexer = Lexer::new();
    let mut start = 0;
    for &split in splits {
        lexer.process_chunk(&chars[start..split]).unwrap();
        start = split;
    }
    lexer.process_chunk(&chars[start..]).unwrap();
    lexer.finish().unwrap().to_vec()
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let actual = Lexer::lex(&case.input).unwrap();
    compare(case.input.clone(), &case.expected(), &actual, 0, "canonical".to_string())
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - 50% chance of raw text before the case (shifts every span)
/// - random chunk partition of the input (geometric number of cuts)
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let prefix = if gen.chance(0.5) { gen.raw_text() } else { String::new() };
    let shift = prefix.chars().count();
    let input = format!("{}{}", prefix, case.input);
    let splits = gen.splits(input.chars().count());

    let mut expected = case.expected();
    for token in &mut expected {
        token.pos_start += shift;
        token.pos_end += shift;
    }
    if shift > 0 {
        match expected.first_mut() {
            Some(first) if first.kind == TokenKind::RawText => first.pos_start = 0,
            _ => expected.insert(0, Token::raw(0, shift)),
        }
    }

    let actual = lex_in_chunks(&input, &splits);
    compare(input, &expected, &actual, gen.seed, format!("prefix {} splits {:?}", shift, splits))
}

fn compare(input: String, expected: &[Token], actual: &[Token], seed: u64, variation: String) -> TestResult {
    TestResult {
        passed: expected == actual,
        input,
        expected: render(expected),
        actual: render(actual),
        seed,
        variation,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set TWOFOLD_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("Variation: {}", self.variation);
        eprintln!("\nInput:");
        eprintln!("{:?}", self.input);
        eprintln!("\nExpected tokens:");
        for (i, t) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, t);
        }
        eprintln!("\nActual tokens:");
        for (i, t) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, t);
        }
    }
}
