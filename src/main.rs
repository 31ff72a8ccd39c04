use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fzr::corpus::Corpus;
use fzr::output;
use fzr::utils::{self, progress, AppConfig, MIN_LINES};
use std::io::{self, IsTerminal};
use std::time::Instant;
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "FZR_LOG";

#[derive(Parser)]
#[command(name = "fzr", version)]
#[command(about = "Fast fuzzy finder: reads candidates from stdin and prints the chosen one")]
struct Cli {
    /// Result lines to display: a number (at least 3) or "max"
    #[arg(short, long, value_parser = parse_lines)]
    lines: Option<Lines>,

    /// Input prompt
    #[arg(short, long)]
    prompt: Option<String>,

    /// Initial query for interactive mode
    #[arg(short, long)]
    query: Option<String>,

    /// Print ranked matches for QUERY and exit
    #[arg(short = 'e', long = "show-matches", value_name = "QUERY")]
    show_matches: Option<String>,

    /// Show the score of each match
    #[arg(short = 's', long)]
    show_scores: bool,

    /// Show the match count under the prompt as [available/total]
    #[arg(short = 'i', long)]
    show_info: bool,

    /// Number of search workers (0: one per CPU)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Input record delimiter (single byte, or \n, \t, \0)
    #[arg(short, long, value_parser = utils::parse_delimiter, conflicts_with = "read0")]
    delimiter: Option<u8>,

    /// Read NUL-separated input
    #[arg(short = '0', long)]
    read0: bool,

    /// Run the search N times and exit
    #[arg(
        short,
        long,
        value_name = "N",
        num_args = 0..=1,
        default_missing_value = "100",
        requires = "show_matches"
    )]
    benchmark: Option<u32>,

    /// When to colour matched characters in filter output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lines {
    Count(usize),
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

fn parse_lines(s: &str) -> Result<Lines, String> {
    if s == "max" {
        return Ok(Lines::Max);
    }
    match s.parse::<usize>() {
        Ok(n) if n >= MIN_LINES => Ok(Lines::Count(n)),
        _ => Err(format!(
            "invalid line count {:?}: expected a number >= {} or \"max\"",
            s, MIN_LINES
        )),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = AppConfig::load()?;
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(lines) = cli.lines {
        config.lines = match lines {
            Lines::Count(n) => n,
            Lines::Max => usize::MAX,
        };
    }
    if let Some(prompt) = cli.prompt {
        config.prompt = prompt;
    }
    config.show_scores |= cli.show_scores;
    config.show_info |= cli.show_info;
    config.validate().context("Invalid configuration")?;

    let delimiter = if cli.read0 {
        b'\0'
    } else {
        cli.delimiter.unwrap_or(b'\n')
    };

    let mut corpus = Corpus::new(config.search_options())?;
    let count = corpus
        .load(io::stdin().lock(), delimiter)
        .context("Failed to read candidates from stdin")?;
    tracing::info!(count, workers = corpus.workers(), "candidates loaded");

    match (cli.show_matches, cli.benchmark) {
        (Some(query), Some(iterations)) => run_benchmark(&mut corpus, &query, iterations),
        (Some(query), None) => run_filter(&mut corpus, &query, config.show_scores, cli.color),
        (None, _) => run_interactive(corpus, &config, cli.query),
    }
}

fn run_benchmark(corpus: &mut Corpus, query: &str, iterations: u32) -> Result<()> {
    let pb = progress::iteration_bar(iterations as u64, "searching");
    let start = Instant::now();

    for _ in 0..iterations {
        corpus.search(query);
        pb.inc(1);
    }

    let elapsed = start.elapsed();
    pb.finish_with_message(format!(
        "{} matches, {:.2?} per search",
        corpus.available(),
        elapsed / iterations.max(1)
    ));
    tracing::info!(iterations, elapsed_ms = elapsed.as_millis() as u64, "benchmark finished");
    Ok(())
}

fn run_filter(corpus: &mut Corpus, query: &str, show_scores: bool, color: ColorMode) -> Result<()> {
    corpus.search(query);

    let choice = match color {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if io::stdout().is_terminal() => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    };

    match output::print_matches(corpus, query, show_scores, choice) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result.context("Failed to write matches"),
    }
}

#[cfg(feature = "interactive")]
fn run_interactive(corpus: Corpus, config: &AppConfig, query: Option<String>) -> Result<()> {
    use fzr::tui::{self, Outcome, Settings};

    let settings = Settings {
        prompt: config.prompt.clone(),
        lines: config.lines,
        show_scores: config.show_scores,
        show_info: config.show_info,
    };

    match tui::run(corpus, settings, query)? {
        Outcome::Accepted(choice) => {
            println!("{}", choice);
            Ok(())
        }
        Outcome::Aborted => std::process::exit(1),
    }
}

#[cfg(not(feature = "interactive"))]
fn run_interactive(_corpus: Corpus, _config: &AppConfig, _query: Option<String>) -> Result<()> {
    anyhow::bail!("interactive mode is not available in this build; use -e/--show-matches QUERY")
}
