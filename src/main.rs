//! Slack API methods used:
//! - <https://api.slack.com/methods/conversations.list>
//! - <https://api.slack.com/methods/conversations.history>
//! - <https://api.slack.com/methods/chat.postMessage>
//!
//! Bot scopes needed: `channels:read`, `channels:history`, `chat:write`.

use anyhow::{Context, Result};
use channel_forecast::core::config::{AppConfig, Cli};
use channel_forecast::report::{MessageTemplate, ReportDriver};
use channel_forecast::slack::SlackClient;
use clap::Parser;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    channel_forecast::setup_logging(cli.log_level(), cli.log_json);

    let config = AppConfig::from_env(&cli).map_err(|e| {
        error!("{}", e);
        e
    })?;

    let template = MessageTemplate::load(&config.template_path).map_err(|e| {
        error!("{}", e);
        e
    })?;

    let client = SlackClient::new(config.slack_bot_token.clone());
    let dry_run = config.dry_run;
    let driver = ReportDriver::new(client, config, template);

    let rendered = driver
        .run(chrono::Utc::now())
        .await
        .context("channel report failed")?;

    if dry_run {
        let payload = serde_json::json!({
            "text": rendered.text,
            "blocks": rendered.blocks,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    Ok(())
}
