//! The three Slack Web API calls the report depends on.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::models::{ChannelRecord, HistoryMessage};
use crate::errors::ReportError;

#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// `conversations.list`, a single page of at most `limit` channels.
    async fn list_channels(&self, limit: u16) -> Result<Vec<ChannelRecord>, ReportError>;

    /// `conversations.history`, newest message first.
    async fn recent_messages(
        &self,
        channel_id: &str,
        limit: u16,
    ) -> Result<Vec<HistoryMessage>, ReportError>;

    /// `chat.postMessage` with a plain-text fallback and Block Kit blocks.
    async fn post_blocks(
        &self,
        channel_id: &str,
        text_fallback: &str,
        blocks: &Value,
    ) -> Result<(), ReportError>;
}
