use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/expenses.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub timezone: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timeout_secs: 10,
            timezone: "UTC".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}

#[derive(Debug, Parser)]
#[command(name = "expenses", about = "Record and review expenses", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override request timeout, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Override timezone (IANA name) used for the "last 7 days" window.
    #[arg(long)]
    timezone: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Expenses of the last 7 days.
    Recent,
    /// Every expense.
    All,
    /// Record a new expense.
    Add {
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: String,
        /// Date (YYYY-MM-DD or RFC3339); defaults to now.
        #[arg(long)]
        date: Option<String>,
    },
    /// Change fields of an existing expense.
    Edit {
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an expense.
    Delete { id: String },
}

pub fn load() -> Result<(AppConfig, Command)> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<(AppConfig, Command)> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("EXPENSES"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok((settings, args.command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> (AppConfig, Command) {
        let mut full = vec!["expenses", "--config", "does/not/exist"];
        full.extend_from_slice(argv);
        resolve(Args::try_parse_from(full).unwrap()).unwrap()
    }

    #[test]
    fn defaults_apply_without_file() {
        let (config, command) = parse(&["recent"]);
        assert_eq!(command, Command::Recent);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.tz().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn cli_overrides_config() {
        let (config, _) = parse(&[
            "--base-url",
            "https://expenses.example.com",
            "--timezone",
            "Europe/Rome",
            "--timeout-secs",
            "3",
            "all",
        ]);
        assert_eq!(config.base_url, "https://expenses.example.com");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Rome);
    }

    #[test]
    fn edit_takes_optional_fields() {
        let (_, command) = parse(&["edit", "abc", "--amount", "12.50"]);
        assert_eq!(
            command,
            Command::Edit {
                id: "abc".to_string(),
                description: None,
                amount: Some("12.50".to_string()),
                date: None,
            }
        );
    }

    #[test]
    fn bad_timezone_is_reported() {
        let (config, _) = parse(&["--timezone", "Mars/Olympus", "recent"]);
        assert!(matches!(config.tz(), Err(AppError::Timezone(_))));
    }
}
