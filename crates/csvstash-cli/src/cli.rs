//! CLI argument definitions.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use csvstash_cli::logging::{LogConfig, LogFormat};
use csvstash_conf::DEFAULT_SINCEDB_PATH;

#[derive(Parser)]
#[command(
    name = "csvstash",
    version,
    about = "Normalize a CSV file to UTF-8 and generate a Logstash pipeline for it",
    long_about = "Normalize a CSV file to UTF-8 and generate a Logstash pipeline for it.\n\n\
                  The source encoding is detected by trying UTF-8, CP949 and UTF-16 in turn.\n\
                  Non-UTF-8 files are copied to <name>_utf8.<ext> next to the source file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "compact",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging setup for this invocation.
    ///
    /// `--log-level` beats `-v`/`-q`; `RUST_LOG` is only honored when neither
    /// is given. ANSI output follows `--color`, and in auto mode is off for
    /// log files and non-terminal stderr.
    pub fn log_config(&self) -> LogConfig {
        let explicit_level = self.verbosity.is_present() || self.log_level.is_some();
        let level_filter = self
            .log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };

        LogConfig {
            level_filter,
            use_env_filter: !explicit_level,
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize the CSV and write the Logstash pipeline.
    Prepare(PrepareArgs),

    /// Report the detected and sniffed encodings of a file without writing anything.
    Detect(DetectArgs),
}

#[derive(Args)]
pub struct PrepareArgs {
    /// CSV file to prepare (overrides `csv_file_path` from --config).
    #[arg(value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Where to write the Logstash pipeline (overrides `logstash_conf_path`).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// JSON job file with paths and connection settings.
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Elasticsearch host address [default: http://localhost:9200].
    #[arg(long = "hosts", value_name = "URL")]
    pub hosts: Option<String>,

    /// Target index name.
    #[arg(long = "index", value_name = "NAME")]
    pub index: Option<String>,

    #[arg(long = "user", value_name = "NAME")]
    pub user: Option<String>,

    #[arg(long = "password", value_name = "SECRET")]
    pub password: Option<String>,

    /// CA certificate bundle for TLS connections to Elasticsearch.
    #[arg(long = "ca-cert", value_name = "PATH")]
    pub ssl_certificate_authorities: Option<String>,

    /// Logstash sincedb location; the default discards read offsets on Windows.
    #[arg(long = "sincedb-path", value_name = "PATH", default_value = DEFAULT_SINCEDB_PATH)]
    pub sincedb_path: String,
}

#[derive(Args)]
pub struct DetectArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
