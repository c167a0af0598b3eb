// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use koscribe::app_config::{self, Config};
use koscribe::app_controller::Controller;
use koscribe::file_utils;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe and translate every audio file in the input directory (default command)
    Run(RunArgs),

    /// Recursively export file metadata under a directory to CSV
    Scan {
        /// Root directory to scan
        root: PathBuf,
        /// Output CSV file path
        out: PathBuf,
        /// Include hidden files and directories
        #[arg(long)]
        hidden: bool,
    },

    /// Concatenate produced transcripts into one file
    Merge {
        /// Directory containing the transcript files
        #[arg(default_value = "transcripts")]
        dir: PathBuf,
        /// Output file path
        #[arg(default_value = "merged_output.txt")]
        out: PathBuf,
    },

    /// Generate shell completions for koscribe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input directory of audio files (overrides config)
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Output directory for transcripts (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// koscribe - batch audio transcription and Korean translation
///
/// Slices audio files into segments, transcribes them through a remote
/// speech-to-text API, and translates the transcript sentence by sentence.
#[derive(Parser, Debug)]
#[command(name = "koscribe")]
#[command(version = "1.0.0")]
#[command(about = "Batch audio transcription and translation pipeline")]
#[command(long_about = "koscribe walks a directory of audio files, transcribes each one in
fixed-duration segments, translates the transcript, and writes one
<name>_ko.txt document per input file. Files whose output already exists
are skipped, so an interrupted batch can simply be rerun.

EXAMPLES:
    koscribe                              # Process ./converted into ./transcripts
    koscribe -i lectures -o out           # Explicit input/output directories
    koscribe --log-level debug            # Verbose segment-level logging
    koscribe scan /data files.csv         # Export file metadata to CSV
    koscribe merge transcripts all.txt    # Concatenate produced transcripts
    koscribe completions bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file
    doesn't exist, a default one is created automatically. The API key is
    read from the config file or the OPENAI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    if CustomLogger::init(LevelFilter::Info).is_err() {
        eprintln!("Failed to initialize logger");
        return ExitCode::FAILURE;
    }

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "koscribe", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Scan { root, out, hidden }) => run_scan(&root, &out, hidden),
        Some(Commands::Merge { dir, out }) => run_merge(&dir, &out),
        Some(Commands::Run(args)) => run_pipeline(args).await,
        None => run_pipeline(cli.run).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_scan(root: &PathBuf, out: &PathBuf, hidden: bool) -> Result<()> {
    info!("Scanning {}", root.display());
    let records = file_utils::collect_file_records(root, hidden)?;
    file_utils::write_records_csv(&records, out)?;
    info!("Wrote {} rows to {}", records.len(), out.display());
    Ok(())
}

fn run_merge(dir: &PathBuf, out: &PathBuf) -> Result<()> {
    let merged = file_utils::merge_transcripts(dir, out, "ko")?;
    info!("Merged {} transcript(s) into {}", merged, out.display());
    Ok(())
}

async fn run_pipeline(args: RunArgs) -> Result<()> {
    let mut config = Config::from_file(&args.config_path)
        .with_context(|| format!("Failed to load config: {}", args.config_path))?;

    // Override config with CLI options if provided
    if let Some(input_dir) = &args.input_dir {
        config.input_dir = input_dir.to_string_lossy().to_string();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.to_string_lossy().to_string();
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(level_filter(&config.log_level));

    // A missing credential is fatal before any work begins
    config.validate()?;

    let controller = Controller::with_config(config)?;
    controller.run_folder().await?;
    Ok(())
}
