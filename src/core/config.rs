use chrono_tz::Tz;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use tracing::Level;

use crate::errors::ReportError;

/// Environment variable holding the Slack bot token.
pub const SLACK_BOT_TOKEN_VAR: &str = "SLACK_BOT_TOKEN";

pub const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";
pub const DEFAULT_TEMPLATE_PATH: &str = "message_template.json";
pub const DEFAULT_HISTORY_LIMIT: u16 = 10;

/// Slack caps `limit` at 1000 for both `conversations.list` and `conversations.history`.
pub const MAX_PAGE_LIMIT: u16 = 1000;

/// Post a weather-style activity report of every channel to a Slack channel.
#[derive(Debug, Clone, Parser)]
#[command(name = "channel-forecast", version, about)]
pub struct Cli {
    /// Channel to post the message to
    #[arg(long = "target_channel_id")]
    pub target_channel_id: String,

    /// Time zone used to print last-update dates
    #[arg(long = "time_zone", default_value = DEFAULT_TIME_ZONE)]
    pub time_zone: String,

    /// Message template file
    #[arg(long = "template", default_value = DEFAULT_TEMPLATE_PATH)]
    pub template: PathBuf,

    /// Number of recent messages inspected per channel
    #[arg(long = "history_limit", default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: u16,

    /// Print the rendered payload instead of posting it
    #[arg(long = "dry_run")]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long = "log_json")]
    pub log_json: bool,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// `--verbose` wins over `--quiet` when both are given.
    #[must_use]
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::INFO
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub target_channel_id: String,
    pub time_zone: Tz,
    pub template_path: PathBuf,
    pub history_limit: u16,
    pub channel_limit: u16,
    pub dry_run: bool,
}

impl AppConfig {
    /// Build the configuration from parsed flags and `SLACK_BOT_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::ConfigError` if the token is missing or the time zone is unknown.
    pub fn from_env(cli: &Cli) -> Result<Self, ReportError> {
        Self::from_cli(cli, env::var(SLACK_BOT_TOKEN_VAR).ok())
    }

    /// # Errors
    ///
    /// Returns `ReportError::ConfigError` if `slack_bot_token` is missing or empty,
    /// the target channel is blank, or the time zone is unknown.
    pub fn from_cli(cli: &Cli, slack_bot_token: Option<String>) -> Result<Self, ReportError> {
        let slack_bot_token = slack_bot_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ReportError::ConfigError(format!(
                    "{SLACK_BOT_TOKEN_VAR} is not set; has the environment variable been exported?"
                ))
            })?;

        let target_channel_id = cli.target_channel_id.trim().to_string();
        if target_channel_id.is_empty() {
            return Err(ReportError::ConfigError(
                "--target_channel_id must not be empty".to_string(),
            ));
        }

        let time_zone = cli.time_zone.parse::<Tz>().map_err(|e| {
            ReportError::ConfigError(format!("invalid time zone '{}': {}", cli.time_zone, e))
        })?;

        Ok(Self {
            slack_bot_token,
            target_channel_id,
            time_zone,
            template_path: cli.template.clone(),
            history_limit: cli.history_limit.clamp(1, MAX_PAGE_LIMIT),
            channel_limit: MAX_PAGE_LIMIT,
            dry_run: cli.dry_run,
        })
    }
}
