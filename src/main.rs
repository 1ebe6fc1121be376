//! `blockfreq` command-line tool
//!
//! ```text
//! blockfreq profile <PATH>... --blocksize <BITS> --fpr <P> [--out-dir DIR]
//! blockfreq compare <EXPECTED> <OBSERVED> [--min-freq N] [--output FILE]
//! ```
//!
//! Logs go to stderr. The comparison result is printed to stdout as JSON.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blockfreq::config::{CompareConfig, ProfileConfig, DEFAULT_MIN_FREQ, DEFAULT_PROFILE_DIR};
use blockfreq::{pipeline, store, ChiSquareTest, Error};

#[derive(Parser, Debug)]
#[command(
    name = "blockfreq",
    version,
    about = "Repeated-block frequency profiling and comparison"
)]
struct Cli {
    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value_t = LogFormat::Auto,
        env = "BLOCKFREQ_LOG_FORMAT",
        global = true
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// JSON when stderr is not a terminal, text otherwise
    Auto,
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Profile files (or every file in a directory) and store the profiles
    Profile(ProfileArgs),
    /// Compare an observed profile against an expected one
    Compare(CompareArgs),
}

#[derive(Args, Debug)]
struct ProfileArgs {
    /// Files or directories to profile
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Block size in bits, a positive multiple of 8
    #[arg(long)]
    blocksize: u32,

    /// Target false-positive rate of the membership filter, in (0, 1)
    #[arg(long)]
    fpr: f64,

    /// Directory profiles are written to
    #[arg(long, env = "BLOCKFREQ_PROFILE_DIR", default_value = DEFAULT_PROFILE_DIR)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Profile of the reference stream
    expected: PathBuf,

    /// Profile of the stream under test
    observed: PathBuf,

    /// Minimum expected bucket weight before merging stops
    #[arg(long, default_value_t = DEFAULT_MIN_FREQ)]
    min_freq: u64,

    /// Also write the result to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let result = match cli.command {
        Command::Profile(args) => run_profile(args),
        Command::Compare(args) => run_compare(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "blockfreq failed");
            if e.is_config() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run_profile(args: ProfileArgs) -> Result<(), Error> {
    // Reject bad parameters before touching any input
    let config = ProfileConfig::new(args.blocksize, args.fpr)?;
    let inputs = pipeline::discover_inputs(&args.paths)?;

    tracing::info!(
        inputs = inputs.len(),
        out_dir = %args.out_dir.display(),
        "profiling inputs"
    );

    for input in &inputs {
        let mut progress = |processed: u64, total: u64| {
            let percent = if total == 0 {
                100.0
            } else {
                processed as f64 * 100.0 / total as f64
            };
            tracing::info!(path = %input.display(), processed, total, percent, "progress");
        };
        pipeline::profile_to_dir(input, config, &args.out_dir, &mut progress)?;
    }
    Ok(())
}

fn run_compare(args: CompareArgs) -> Result<(), Error> {
    let config = CompareConfig::with_min_freq(args.min_freq);
    let comparison = pipeline::compare_files(&args.expected, &args.observed, &config)?;

    write_result(std::io::stdout().lock(), &comparison.test)?;

    if let Some(output) = &args.output {
        store::save_report(&comparison.test, output)?;
        tracing::info!(path = %output.display(), "result written");
    }
    Ok(())
}

/// Write the test result as pretty JSON followed by a newline
fn write_result<W: Write>(mut out: W, test: &ChiSquareTest) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut out, test).map_err(|e| Error::Stream(e.into()))?;
    writeln!(out)?;
    Ok(())
}

/// Initialize the tracing subscriber on stderr
///
/// - `Text`: human-readable
/// - `Json`: one JSON object per event
/// - `Auto`: JSON when stderr is not a terminal
fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = match format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stderr().is_terminal(),
    };

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
