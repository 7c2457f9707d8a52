//! Slack API client module
//!
//! Channel listing goes through slack-morphism's typed session API. History and
//! posting use plain Web API calls so arbitrary message subtypes and raw Block
//! Kit payloads pass through untouched. No call is retried.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiConversationsListRequest;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelInfo};
use tracing::{debug, warn};

use super::api::WorkspaceApi;
use crate::core::models::{ChannelRecord, HistoryMessage};
use crate::errors::ReportError;

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a ReportError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(Client::new);

const CONVERSATIONS_HISTORY_URL: &str = "https://slack.com/api/conversations.history";
const CHAT_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Map slack-morphism's channel model onto the report's input record.
#[must_use]
pub fn channel_record_from(info: &SlackChannelInfo) -> ChannelRecord {
    ChannelRecord {
        id: info.id.0.clone(),
        name: info.name.clone().unwrap_or_else(|| info.id.0.clone()),
        created: info.created.0.timestamp(),
        is_archived: info.flags.is_archived.unwrap_or(false),
        num_members: info.num_members.map(u64::from).unwrap_or(0),
        topic: info
            .topic
            .as_ref()
            .map(|t| t.value.clone())
            .unwrap_or_default(),
        purpose: info
            .purpose
            .as_ref()
            .map(|p| p.value.clone())
            .unwrap_or_default(),
    }
}

/// Fail with the Slack `error` code unless the body says `"ok": true`.
///
/// # Errors
///
/// Returns `ReportError::ApiError` naming `method` and Slack's error code.
pub fn ensure_ok(method: &str, body: &Value) -> Result<(), ReportError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(());
    }
    Err(ReportError::ApiError(format!(
        "{method} error: {}",
        body.get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    )))
}

/// Extract messages from a `conversations.history` response body.
///
/// Any message with a `subtype` key is tagged, whatever the value. Messages
/// without a `ts` are dropped.
///
/// # Errors
///
/// Returns `ReportError::ApiError` if Slack reported a failure.
pub fn parse_history_response(body: &Value) -> Result<Vec<HistoryMessage>, ReportError> {
    ensure_ok("conversations.history", body)?;

    let messages = body
        .get("messages")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|msg| {
            let ts = msg.get("ts").and_then(Value::as_str)?;
            let subtype = msg
                .get("subtype")
                .map(|s| s.as_str().unwrap_or_default().to_string());
            Some(HistoryMessage {
                ts: ts.to_string(),
                subtype,
            })
        })
        .collect();

    Ok(messages)
}

#[must_use]
pub fn build_post_message_payload(channel_id: &str, text_fallback: &str, blocks: &Value) -> Value {
    json!({
        "channel": channel_id,
        "text": text_fallback,
        "blocks": blocks,
    })
}

/// Slack Web API client authenticated with a bot token
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    async fn read_json(method: &str, resp: reqwest::Response) -> Result<Value, ReportError> {
        if !resp.status().is_success() {
            return Err(ReportError::ApiError(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        resp.json().await.map_err(|e| {
            ReportError::HttpError(format!("{method} JSON parse error: {e}"))
        })
    }
}

#[async_trait]
impl WorkspaceApi for SlackClient {
    async fn list_channels(&self, limit: u16) -> Result<Vec<ChannelRecord>, ReportError> {
        let session = SLACK_CLIENT
            .as_ref()
            .ok_or_else(|| {
                ReportError::HttpError("Slack HTTP connector not initialized".to_string())
            })?
            .open_session(&self.token);

        let request = SlackApiConversationsListRequest::new().with_limit(limit);
        let response = session.conversations_list(&request).await?;
        debug!("conversations.list returned {} channels", response.channels.len());

        Ok(response.channels.iter().map(channel_record_from).collect())
    }

    async fn recent_messages(
        &self,
        channel_id: &str,
        limit: u16,
    ) -> Result<Vec<HistoryMessage>, ReportError> {
        let limit = limit.to_string();
        let resp = HTTP_CLIENT
            .get(CONVERSATIONS_HISTORY_URL)
            .bearer_auth(&self.token.token_value.0)
            .query(&[
                ("channel", channel_id),
                ("inclusive", "true"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let body = Self::read_json("conversations.history", resp).await?;
        parse_history_response(&body)
    }

    async fn post_blocks(
        &self,
        channel_id: &str,
        text_fallback: &str,
        blocks: &Value,
    ) -> Result<(), ReportError> {
        let payload = build_post_message_payload(channel_id, text_fallback, blocks);

        let resp = HTTP_CLIENT
            .post(CHAT_POST_MESSAGE_URL)
            .bearer_auth(&self.token.token_value.0)
            .json(&payload)
            .send()
            .await?;

        let body = Self::read_json("chat.postMessage", resp).await?;
        ensure_ok("chat.postMessage", &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_ok_reports_slack_error_code() {
        assert!(ensure_ok("chat.postMessage", &json!({"ok": true})).is_ok());

        let err = ensure_ok("chat.postMessage", &json!({"ok": false, "error": "not_in_channel"}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to access Slack API: chat.postMessage error: not_in_channel"
        );

        let err = ensure_ok("chat.postMessage", &json!({})).unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_parse_history_response_tags_subtypes() {
        let body = json!({
            "ok": true,
            "messages": [
                {"type": "message", "subtype": "channel_join", "ts": "1700000300.000200"},
                {"type": "message", "subtype": "some_future_subtype", "ts": "1700000200.000100"},
                {"type": "message", "user": "U1", "text": "hi", "ts": "1700000100.000001"},
                {"type": "message", "text": "no ts"}
            ]
        });

        let messages = parse_history_response(&body).unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].subtype.as_deref(), Some("channel_join"));
        assert_eq!(messages[1].subtype.as_deref(), Some("some_future_subtype"));
        assert!(messages[2].is_activity());
        assert_eq!(messages[2].ts, "1700000100.000001");
    }

    #[test]
    fn test_parse_history_response_error() {
        let body = json!({"ok": false, "error": "channel_not_found"});
        let err = parse_history_response(&body).unwrap_err();
        assert!(matches!(err, ReportError::ApiError(ref m) if m.contains("channel_not_found")));
    }

    #[test]
    fn test_channel_record_from_slack_model() {
        let info: SlackChannelInfo = serde_json::from_value(json!({
            "id": "C024BE91L",
            "name": "fun",
            "is_channel": true,
            "created": 1_360_782_804,
            "creator": "U024BE7LH",
            "is_archived": false,
            "is_general": false,
            "num_members": 6,
            "topic": {"value": "Fun times", "creator": "U024BE7LV", "last_set": 1_369_677_212},
            "purpose": {"value": "", "creator": "", "last_set": 0}
        }))
        .unwrap();

        let record = channel_record_from(&info);
        assert_eq!(record.id, "C024BE91L");
        assert_eq!(record.name, "fun");
        assert_eq!(record.created, 1_360_782_804);
        assert!(!record.is_archived);
        assert_eq!(record.num_members, 6);
        assert_eq!(record.topic, "Fun times");
        assert_eq!(record.purpose, "");
    }

    #[test]
    fn test_build_post_message_payload() {
        let blocks = json!([{"type": "divider"}]);
        let payload = build_post_message_payload("C1", "fallback", &blocks);
        assert_eq!(payload["channel"], "C1");
        assert_eq!(payload["text"], "fallback");
        assert_eq!(payload["blocks"][0]["type"], "divider");
    }
}
