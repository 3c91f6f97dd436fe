//! dobverify: check a candidate's claimed date of birth against their
//! birth certificate.

mod commands;
mod config;

use std::path::PathBuf;

use clap::Parser;
use dobverify_utils::LogFormat;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "dobverify", about = "Date-of-birth verification against birth certificates")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "DOBVERIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the submission database.
    #[arg(long, global = true, env = "DOBVERIFY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "DOBVERIFY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "DOBVERIFY_LOG_FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Also append logs to this file.
    #[arg(long, global = true, env = "DOBVERIFY_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Submit one candidate and verify their date of birth.
    /// Missing arguments are prompted for.
    Verify {
        name: Option<String>,
        date_of_birth: Option<String>,
        /// Certificate document reference (path to its text, or to the scan
        /// when an external text extractor is configured).
        dob_cert: Option<String>,
    },
    /// Verify a JSON array of `{name, date_of_birth, dob_cert}` objects.
    Batch { file: PathBuf },
    /// Print the date found in a certificate, without storing anything.
    Extract { dob_cert: String },
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format {other:?}")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
    if cli.log_file.is_some() {
        config.log.file = cli.log_file;
    }

    dobverify_utils::init_tracing(&config.log)?;
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Verify {
            name,
            date_of_birth,
            dob_cert,
        } => commands::verify(&config, name, date_of_birth, dob_cert),
        Command::Batch { file } => commands::batch(&config, &file),
        Command::Extract { dob_cert } => commands::extract(&config, &dob_cert),
    }
}
