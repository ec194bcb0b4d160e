use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::grid::Size;

pub const DEFAULT_GRID_COUNT: u16 = 20;
pub const DEFAULT_TICK_MS: u64 = 150;
pub const DEFAULT_POLL_MS: u64 = 200;
pub const DEFAULT_WORKERS_MS: u64 = 2000;
const DEFAULT_LOG_FILE: &str = "snekrs-sync.log";

/// Snake on a wrapping grid, simulated locally or by a remote authority.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cells along each edge of the square grid.
    #[arg(
        long,
        value_name = "CELLS",
        default_value_t = DEFAULT_GRID_COUNT,
        value_parser = clap::value_parser!(u16).range(4..=200)
    )]
    grid: u16,
    /// Milliseconds between movement ticks.
    #[arg(
        long = "tick-ms",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_TICK_MS,
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    tick_ms: u64,
    /// Milliseconds between state polls in remote mode.
    #[arg(
        long = "poll-ms",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_POLL_MS,
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    poll_ms: u64,
    /// Milliseconds between worker telemetry polls in remote mode.
    #[arg(
        long = "workers-ms",
        value_name = "MILLISECONDS",
        default_value_t = DEFAULT_WORKERS_MS,
        value_parser = clap::value_parser!(u64).range(1..=600_000)
    )]
    workers_ms: u64,
    /// Base URL of a coordinator, e.g. http://127.0.0.1:8000. Makes the
    /// coordinator authoritative.
    #[arg(long, value_name = "URL", conflicts_with = "loopback")]
    remote: Option<String>,
    /// Run remote mode against an in-process authority.
    #[arg(long)]
    loopback: bool,
    /// Where to write the log; the terminal is busy drawing the game.
    #[arg(long = "log-file", value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Where the next game state comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Local,
    Http(String),
    Loopback,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local => f.write_str("local"),
            Source::Http(url) => write!(f, "remote {url}"),
            Source::Loopback => f.write_str("loopback"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub size: Size,
    pub tick: Duration,
    pub poll: Duration,
    pub telemetry: Duration,
    pub source: Source,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size: Size::square(DEFAULT_GRID_COUNT),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            poll: Duration::from_millis(DEFAULT_POLL_MS),
            telemetry: Duration::from_millis(DEFAULT_WORKERS_MS),
            source: Source::Local,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: LevelFilter::Info,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let source = match (cli.remote, cli.loopback) {
            (Some(url), _) => Source::Http(url),
            (None, true) => Source::Loopback,
            (None, false) => Source::Local,
        };

        Config {
            size: Size::square(cli.grid),
            tick: Duration::from_millis(cli.tick_ms),
            poll: Duration::from_millis(cli.poll_ms),
            telemetry: Duration::from_millis(cli.workers_ms),
            source,
            log_file: cli.log_file,
            log_level: cli.log_level.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let argv = std::iter::once("snekrs-sync").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(Config::from)
    }

    #[test]
    fn test_defaults_match_default_config() {
        assert_eq!(parse(&[]).unwrap(), Config::default());
    }

    #[test]
    fn test_remote_url() {
        let config = parse(&["--remote", "http://10.0.0.1:8000", "--poll-ms", "500"]).unwrap();
        assert_eq!(config.source, Source::Http("http://10.0.0.1:8000".to_owned()));
        assert_eq!(config.poll, Duration::from_millis(500));
    }

    #[test]
    fn test_loopback() {
        let config = parse(&["--loopback", "--grid", "30", "--log-level", "debug"]).unwrap();
        assert_eq!(config.source, Source::Loopback);
        assert_eq!(config.size, Size::square(30));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_remote_and_loopback_conflict() {
        assert!(parse(&["--loopback", "--remote", "http://x"]).is_err());
    }

    #[test]
    fn test_rejects_tiny_grid_and_zero_tick() {
        assert!(parse(&["--grid", "2"]).is_err());
        assert!(parse(&["--tick-ms", "0"]).is_err());
    }
}
