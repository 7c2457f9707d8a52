/// channel-forecast - posts a weather-style activity report of Slack channels.
///
/// Every run lists the workspace's channels, looks at the latest few messages of
/// each non-archived channel, and tags it with an icon from `:sunny:` (active in
/// the last ten days) down to `:thunder_cloud_and_rain:` (silent for sixty days
/// or more). Channels younger than two weeks always get
/// `:sunrise_over_mountains:`. The summaries are rendered through a Block Kit
/// template and posted to one target channel.
///
/// # Architecture
///
/// - `core::classifier` turns a channel and its last activity into a
///   `ChannelSummary`; it is pure and clock-injected
/// - `slack` wraps `conversations.list`, `conversations.history` and
///   `chat.postMessage` behind the `WorkspaceApi` trait
/// - `report` drives one sequential pass and renders the template
///
/// # Example
///
/// ```no_run
/// use channel_forecast::core::config::{AppConfig, Cli};
/// use channel_forecast::report::{MessageTemplate, ReportDriver};
/// use channel_forecast::slack::SlackClient;
/// use clap::Parser;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cli = Cli::parse();
///     channel_forecast::setup_logging(cli.log_level(), cli.log_json);
///
///     let config = AppConfig::from_env(&cli)?;
///     let template = MessageTemplate::load(&config.template_path)?;
///     let client = SlackClient::new(config.slack_bot_token.clone());
///
///     ReportDriver::new(client, config, template)
///         .run(chrono::Utc::now())
///         .await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod core;
pub mod errors;
pub mod report;
pub mod slack;

/// Configure logging on stderr at `level`, as JSON lines when `json` is set.
///
/// Safe to call more than once; only the first call installs a subscriber.
///
/// # Example
///
/// ```
/// channel_forecast::setup_logging(tracing::Level::INFO, false);
/// ```
pub fn setup_logging(level: tracing::Level, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
