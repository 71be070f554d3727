//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "hourglass")]
#[command(about = "A countdown timer service with pause/resume and background handoff")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// How often the display driver polls the running timer, in milliseconds
    #[arg(long, default_value = "100")]
    pub poll_interval_ms: u64,

    /// Tick length of the background runner, in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Remaining milliseconds handed off by a previous process, run in the background
    #[arg(long)]
    pub resume_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["hourglass"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.tick(), Duration::from_secs(1));
        assert_eq!(config.resume_ms, None);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "hourglass", "-p", "9000", "--resume-ms", "42000", "--tick-ms", "0", "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.resume_ms, Some(42_000));
        assert_eq!(config.tick(), Duration::from_millis(1));
        assert_eq!(config.log_level(), "debug");
    }
}
