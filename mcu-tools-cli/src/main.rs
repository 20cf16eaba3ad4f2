//! MCU Debug Tools CLI Application
//!
//! Command-line front end for the two microcontroller debugging helpers:
//! - `memdebug`: replay a malloc/realloc/free trace and report bad frees and leaks
//! - `pinout`: turn a CubeMX MCU description into a CSV pinout table
//!
//! Reports and tables go to stdout; log output goes to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

mod config;

use config::AppConfig;
use memdebug_analyzer::{AnalyzerConfig, ReportFormat};
use stm32_pinout::PinoutConfig;

/// MCU Debug Tools - Analyze allocator traces and extract STM32 pinouts
#[derive(Parser, Debug)]
#[command(name = "mcu-tools")]
#[command(about = "Analyze allocator traces and extract STM32 pinouts", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a malloc/realloc/free trace for double frees and leaks
    Memdebug {
        /// Trace file to analyze (default: stdin)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Show the caller address logged for each finding
        #[arg(long)]
        callers: bool,

        /// Append trace statistics to the report
        #[arg(long)]
        summary: bool,

        /// Report format
        #[arg(long, value_enum, value_name = "FORMAT")]
        format: Option<FormatArg>,
    },

    /// Convert an STM32CubeMX MCU description XML into a pinout CSV
    Pinout {
        /// The file to parse, e.g. /path/to/cubemx/db/mcu/STM32F103CBUx.xml
        #[arg(value_name = "FILE")]
        filename: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("MCU Debug Tools v{}", env!("CARGO_PKG_VERSION"));

    let AppConfig { memdebug, pinout } = config::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Memdebug {
            input,
            callers,
            summary,
            format,
        } => {
            // Flags can only switch options on
            let callers = memdebug.show_callers || callers;
            let summary = memdebug.summary || summary;

            let mut config = memdebug.with_callers(callers).with_summary(summary);
            if let Some(format) = format {
                config = config.with_format(format.into());
            }
            memdebug_mode(input.as_deref(), &config)
        }
        Command::Pinout { filename } => pinout_mode(&filename, &pinout),
    }
}

/// Memdebug mode - replay the trace, then print all findings
fn memdebug_mode(input: Option<&Path>, config: &AnalyzerConfig) -> Result<()> {
    log::info!(
        "Analyzer v{}, reading trace from {}",
        memdebug_analyzer::VERSION,
        input.map_or_else(|| "stdin".to_string(), |p| format!("{:?}", p))
    );

    let analysis = match input {
        Some(path) => memdebug_analyzer::analyze_file(path)
            .with_context(|| format!("Failed to read trace file: {:?}", path))?,
        None => memdebug_analyzer::analyze(io::stdin().lock())
            .context("Failed to read trace from stdin")?,
    };

    log::info!(
        "{} lines, {} not allocated, {} never freed",
        analysis.stats.lines,
        analysis.stats.not_allocated,
        analysis.stats.outstanding_allocations
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    memdebug_analyzer::write_report(&analysis, config, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Pinout mode - extract every pin, then print the table
fn pinout_mode(path: &Path, config: &PinoutConfig) -> Result<()> {
    log::info!("Pinout extractor v{}", stm32_pinout::VERSION);

    let pins = stm32_pinout::extract_pinout_file(path, config)
        .with_context(|| format!("Failed to extract pinout from {:?}", path))?;

    let stdout = io::stdout();
    stm32_pinout::write_pinout(&pins, stdout.lock())?;

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
