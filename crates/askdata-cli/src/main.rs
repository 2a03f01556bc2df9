//! `askdata`: ask plain-English questions about a CSV file.
//!
//! Usage:
//!   askdata sales.csv --query "average sales" --query "top 3 sales"
//!   askdata sales.csv            # then type questions, one per line

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use askdata_agent::AgentOptions;
use askdata_model::CsvOptions;
use clap::Parser;

mod render;
mod session;

use render::OutputFormat;
use session::{ChatSession, Flow};

#[derive(Parser, Debug)]
#[command(name = "askdata")]
#[command(about = "Ask plain-English questions about a CSV file.")]
#[command(version)]
struct Args {
    /// CSV file to load. Another file can be loaded later with `:load <path>`.
    csv: Option<PathBuf>,

    /// Question to answer (repeatable). Without any, questions are read from stdin.
    #[arg(short, long = "query", value_name = "QUESTION")]
    queries: Vec<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Field delimiter (a single ASCII character).
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Treat the first row as data; columns are named `Column1`, `Column2`, ...
    #[arg(long)]
    no_header: bool,

    /// Rows returned for questions containing "sample".
    #[arg(long, default_value_t = 5)]
    sample_size: usize,

    /// Decimal places kept for averages and medians.
    #[arg(long, default_value_t = 2)]
    round_digits: u32,

    /// Log pipeline decisions to stderr (`RUST_LOG` takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(args) {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        other => other,
    }
}

fn run(args: Args) -> Result<()> {
    if !args.delimiter.is_ascii() {
        bail!("--delimiter must be a single ASCII character, got {:?}", args.delimiter);
    }
    let csv_options = CsvOptions {
        delimiter: args.delimiter as u8,
        has_header: !args.no_header,
        ..CsvOptions::default()
    };
    let agent_options = AgentOptions {
        sample_size: args.sample_size,
        round_digits: args.round_digits,
    };

    let mut session = ChatSession::new(csv_options, agent_options);
    if let Some(path) = &args.csv {
        session.load(path)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if !args.queries.is_empty() {
        for query in &args.queries {
            if session.handle_line(query, args.format, &mut out)? == Flow::Quit {
                break;
            }
        }
        return Ok(());
    }

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    if interactive && !session.is_loaded() {
        writeln!(out, "{}", session::NO_DATASET)?;
    }
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        if session.handle_line(&line?, args.format, &mut out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::BrokenPipe)
    })
}
