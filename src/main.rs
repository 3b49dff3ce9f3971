use clap::Parser;
use instant::Duration;
use linkgrid::{generate_grid, normalize_word, render_grid, trace_word, GenerateOptions, SolverOptions};
use std::fmt::{Debug, Formatter};

/// linkgrid: Arrange the letters of some words on a 4x4 board so every word can be traced
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Words to place on the board
    words: Vec<String>,

    /// Seed for the random filler letters [default: random]
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many milliseconds [default: no limit]
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log search progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Skip double-checking that every word can be traced on the finished board
    #[arg(long)]
    no_trace_check: bool,
}

struct Error(String);

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0) // Print error unquoted
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let words = args
        .words
        .iter()
        .map(|word| normalize_word(word))
        .collect::<Result<Vec<String>, _>>()
        .map_err(|err| Error(err.to_string()))?;

    let options = GenerateOptions {
        seed: args.seed,
        solver: SolverOptions {
            timeout: args.timeout_ms.map(Duration::from_millis),
        },
    };

    let result = generate_grid(&words, &options).map_err(|err| Error(err.to_string()))?;

    log::info!("Seed: {}", result.seed);
    log::info!("{:?}", result.statistics);

    if !args.no_trace_check {
        for word in words.iter().filter(|word| !word.is_empty()) {
            if trace_word(&result.letters, word).is_none() {
                return Err(Error(format!("Word '{}' can't be traced on the board", word)));
            }
        }
    }

    println!("{}", render_grid(&result.letters));

    Ok(())
}
