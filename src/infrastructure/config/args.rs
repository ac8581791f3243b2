use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "textline",
    version,
    about = "A terminal client for an SMS relay backend",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Base URL of the relay backend API.
    #[arg(long, env = "TEXTLINE_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// History refresh cadence in milliseconds.
    #[arg(long, env = "TEXTLINE_POLL_INTERVAL_MS", value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Destination phone number.
    #[arg(long, env = "TEXTLINE_RECIPIENT", value_name = "NUMBER")]
    pub recipient: Option<String>,
}
