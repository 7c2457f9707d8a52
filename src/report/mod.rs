//! Report driver: list channels, find each channel's last activity, classify,
//! sort, render and post. Every Slack call is awaited before the next starts.

pub mod template;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::core::classifier::classify;
use crate::core::config::AppConfig;
use crate::core::models::{ChannelSummary, HistoryMessage};
use crate::errors::ReportError;
use crate::slack::WorkspaceApi;

pub use template::{CAPTION, MessageTemplate, RenderedMessage};

/// Parse a Slack `ts` ("1700000000.000100") into a UTC instant.
#[must_use]
pub fn parse_slack_ts(ts: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = ts.trim().split_once('.').unwrap_or((ts.trim(), ""));
    let secs: i64 = secs.parse().ok()?;

    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut digits: String = frac.chars().take(9).collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    let nanos: u32 = digits.parse().ok()?;

    DateTime::from_timestamp(secs, nanos)
}

/// Timestamp of the newest message that is real activity.
///
/// Subtype messages never count, even when newer than every user message.
/// A message whose `ts` cannot be parsed is skipped.
#[must_use]
pub fn latest_activity(messages: &[HistoryMessage]) -> Option<DateTime<Utc>> {
    messages
        .iter()
        .filter(|msg| {
            debug!("Checking message: {:?}", msg);
            msg.is_activity()
        })
        .filter_map(|msg| {
            let parsed = parse_slack_ts(&msg.ts);
            if parsed.is_none() {
                warn!("Ignoring message with unparsable ts '{}'", msg.ts);
            }
            parsed
        })
        .max()
}

/// Ascending by name, byte-wise and case-sensitive.
pub fn sort_by_name(summaries: &mut [ChannelSummary]) {
    summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

/// Runs one report pass against a [`WorkspaceApi`].
pub struct ReportDriver<A> {
    api: A,
    config: AppConfig,
    template: MessageTemplate,
}

impl<A: WorkspaceApi> ReportDriver<A> {
    #[must_use]
    pub fn new(api: A, config: AppConfig, template: MessageTemplate) -> Self {
        Self {
            api,
            config,
            template,
        }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Classify every non-archived channel, sorted by name.
    ///
    /// # Errors
    ///
    /// Fails only if the channel list cannot be fetched. History failures are
    /// logged and the channel is reported with an unknown last update.
    pub async fn collect_summaries(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChannelSummary>, ReportError> {
        let channels = self
            .api
            .list_channels(self.config.channel_limit)
            .await
            .map_err(|e| {
                error!("Failed to process channel list: {}", e);
                e
            })?;

        let mut summaries = Vec::with_capacity(channels.len());
        for channel in &channels {
            debug!("Processing channel: {:?}", channel);

            if channel.is_archived {
                debug!("Skipping archived channel: {}", channel.name);
                continue;
            }

            let last_update = match self
                .api
                .recent_messages(&channel.id, self.config.history_limit)
                .await
            {
                Ok(messages) => latest_activity(&messages),
                Err(e) => {
                    error!(
                        "Failed to process conversation history for channel '{}': {}",
                        channel.name, e
                    );
                    None
                }
            };
            debug!("Last update for {}: {:?}", channel.name, last_update);

            let summary = classify(channel, last_update, self.config.time_zone, now);
            info!(
                "Appending channel to list: {} ({})",
                summary.name,
                summary.icon.as_str()
            );
            summaries.push(summary);
        }

        sort_by_name(&mut summaries);
        Ok(summaries)
    }

    /// Build the report and post it, or only render it when `dry_run` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if listing channels, rendering or posting fails.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RenderedMessage, ReportError> {
        let summaries = self.collect_summaries(now).await?;
        let rendered = self
            .template
            .render(&summaries, self.config.time_zone, now)?;

        debug!("Rendered template:");
        debug!("-----");
        debug!("{}", rendered.blocks);
        debug!("-----");

        if self.config.dry_run {
            info!(
                "Dry run: not posting {} blocks to {}",
                rendered.block_count(),
                self.config.target_channel_id
            );
            return Ok(rendered);
        }

        self.api
            .post_blocks(
                &self.config.target_channel_id,
                &rendered.text,
                &rendered.blocks,
            )
            .await
            .map_err(|e| {
                error!("Failed to post message: {}", e);
                e
            })?;

        info!(
            "Posted report for {} channels to {}",
            summaries.len(),
            self.config.target_channel_id
        );
        Ok(rendered)
    }
}
