//! `tfold-lex`: lex a TwoFold template and print its tokens.
//!
//! Output is JSON Lines on stdout, one token object per line. Diagnostics go
//! to stderr, filtered by `RUST_LOG` (default `warn`).

mod config;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use tracing::info;
use twofold_core::{lex_reader, LexFailure};

const USAGE: &str = "Usage: tfold-lex <filename>";

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [path] = args.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    match run(path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> anyhow::Result<()> {
    let lexer_config = config::load().context("failed to load configuration")?;
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;

    // tokens committed before a failure are still printed
    let (tokens, failure) = match lex_reader(file, lexer_config) {
        Ok(tokens) => (tokens, None),
        Err(LexFailure { tokens, error }) => (tokens, Some(error)),
    };
    info!(path, tokens = tokens.len(), complete = failure.is_none(), "lexed file");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for token in &tokens {
        serde_json::to_writer(&mut out, token).context("failed to encode token")?;
        out.write_all(b"\n")?;
    }
    out.flush().context("failed to write output")?;

    match failure {
        Some(error) => Err(error).with_context(|| format!("failed to lex {}", path)),
        None => Ok(()),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}
