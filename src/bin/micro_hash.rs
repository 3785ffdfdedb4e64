//! Command-line runner for the collision benchmark.
//!
//! Collision counts and deviations are measurements with no pass threshold,
//! so a run that completes exits with success. An invalid configuration
//! exits with failure before any benchmark starts.

use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;
use micro_hash::BenchConfig;
use micro_hash::HashFunction;
use micro_hash::TableConfig;
use micro_hash::benchmark::ReportTable;
use micro_hash::benchmark::run_all;
use micro_hash::config::DEFAULT_ITERATIONS;
use micro_hash::config::DEFAULT_PRECISION;
use micro_hash::config::DEFAULT_SEED;
use micro_hash::config::MAX_PRECISION;
use tracing::error;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

/// Measure collisions and bucket uniformity of the micro-hash functions
#[derive(Parser, Debug)]
#[command(name = "micro-hash")]
#[command(version)]
struct Args {
    /// Suppress log output except for errors. This overrides the -v flag.
    #[arg(short, long)]
    quiet: bool,

    /// Turn on verbose output. Supply -v multiple times to increase verbosity.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Number of random keys hashed per function
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u64,

    /// Number of low hash bits used for the uniformity buckets
    #[arg(
        short, long,
        default_value_t = DEFAULT_PRECISION,
        value_parser = clap::value_parser!(u32).range(0..=MAX_PRECISION as i64),
    )]
    precision: u32,

    /// Seed of the key generator
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Initial slot count of the set recording seen hashes (a power of two)
    #[arg(long, default_value_t = TableConfig::default().initial_capacity())]
    initial_capacity: usize,

    /// Benchmark every function, not just the integer ones
    #[arg(short, long, conflicts_with = "functions")]
    all: bool,

    /// Functions to benchmark, by name (e.g. int32_wang str_djb2)
    functions: Vec<HashFunction>,
}

fn init_tracing(quiet: bool, verbose: u8) -> LevelFilter {
    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    // The library logs through the `log` facade.
    if tracing_log::LogTracer::init().is_err() {
        eprintln!("a log tracer is already installed");
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("MICRO_HASH_LOG")
        .from_env_lossy();

    let subscriber = Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("a tracing subscriber is already installed");
    }

    level_filter
}

fn build_config(args: &Args) -> Result<BenchConfig, micro_hash::Error> {
    let table = TableConfig::new(
        args.initial_capacity,
        TableConfig::default().max_load_factor(),
    )?;
    Ok(BenchConfig::new(args.iterations, args.precision)?
        .with_seed(args.seed)
        .with_table(table))
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level_filter = init_tracing(args.quiet, args.verbose);

    info!(
        "starting {} {}, log level: {level_filter}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let functions: &[HashFunction] = if args.all {
        &HashFunction::ALL
    } else if args.functions.is_empty() {
        &HashFunction::INTEGER
    } else {
        &args.functions
    };

    info!("benchmarking {} functions", functions.len());
    let reports = run_all(&config, functions);
    print!("{}", ReportTable::new(&config, &reports));

    ExitCode::SUCCESS
}
