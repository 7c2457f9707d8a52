//! Block Kit message template.
//!
//! A template is a JSON document with an optional `text` fallback and three
//! arrays of Block Kit blocks:
//!
//! ```json
//! {
//!   "text":    "{{caption}} ({{channel_count}})",
//!   "header":  [ { "type": "header", "text": { "type": "plain_text", "text": "{{caption}}" } } ],
//!   "channel": [ { "type": "section", "text": { "type": "mrkdwn", "text": "{{icon}} <#{{id}}>" } } ],
//!   "footer":  [ { "type": "divider" } ]
//! }
//! ```
//!
//! `channel` is repeated once per summary, in order. Any string value may use
//! `{{placeholder}}`; object keys are left alone. Unknown placeholders are an
//! error so a typo never reaches the channel.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

use crate::core::models::ChannelSummary;
use crate::errors::ReportError;

/// Fixed caption, and the notification fallback text when the template has no `text`.
pub const CAPTION: &str = "チャンネル 天気予報";

/// Slack rejects messages with more blocks than this.
pub const SLACK_MAX_BLOCKS: usize = 50;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("static regex compile")
});

type Fields = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageTemplate {
    /// Notification fallback text; placeholders from the header scope apply.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub header: Vec<Value>,
    #[serde(default)]
    pub channel: Vec<Value>,
    #[serde(default)]
    pub footer: Vec<Value>,
}

/// Output of [`MessageTemplate::render`], ready for `chat.postMessage`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub text: String,
    pub blocks: Value,
}

impl RenderedMessage {
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.as_array().map_or(0, Vec::len)
    }
}

impl MessageTemplate {
    /// # Errors
    ///
    /// Returns `ReportError::TemplateError` if the file cannot be read or is not a valid template.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ReportError::TemplateError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw).map_err(|e| match e {
            ReportError::TemplateError(m) => {
                ReportError::TemplateError(format!("{}: {m}", path.display()))
            }
            other => other,
        })
    }

    /// # Errors
    ///
    /// Returns `ReportError::TemplateError` if `raw` is not a valid template document.
    pub fn from_json(raw: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Render header, one `channel` section per summary, then footer.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::TemplateError` on an unknown placeholder.
    pub fn render(
        &self,
        summaries: &[ChannelSummary],
        time_zone: Tz,
        generated_at: DateTime<Utc>,
    ) -> Result<RenderedMessage, ReportError> {
        let globals = global_fields(summaries.len(), time_zone, generated_at);
        let text = match &self.text {
            Some(text) => substitute(text, &globals)?,
            None => CAPTION.to_string(),
        };

        let mut blocks = Vec::new();
        for block in &self.header {
            blocks.push(render_value(block, &globals)?);
        }
        for summary in summaries {
            let mut fields = globals.clone();
            fields.extend(channel_fields(summary, time_zone));
            for block in &self.channel {
                blocks.push(render_value(block, &fields)?);
            }
        }
        for block in &self.footer {
            blocks.push(render_value(block, &globals)?);
        }

        if blocks.len() > SLACK_MAX_BLOCKS {
            warn!(
                "Rendered message has {} blocks; Slack accepts at most {}",
                blocks.len(),
                SLACK_MAX_BLOCKS
            );
        }

        Ok(RenderedMessage {
            text,
            blocks: Value::Array(blocks),
        })
    }
}

fn global_fields(channel_count: usize, time_zone: Tz, generated_at: DateTime<Utc>) -> Fields {
    let mut fields = Fields::new();
    fields.insert("caption", CAPTION.to_string());
    fields.insert("channel_count", channel_count.to_string());
    fields.insert(
        "generated_at",
        generated_at
            .with_timezone(&time_zone)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    );
    fields
}

fn channel_fields(summary: &ChannelSummary, time_zone: Tz) -> Fields {
    let created_date = DateTime::from_timestamp(summary.created, 0)
        .map(|dt| dt.with_timezone(&time_zone).format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let mut fields = Fields::new();
    fields.insert("id", summary.id.clone());
    fields.insert("name", summary.name.clone());
    fields.insert("created", summary.created.to_string());
    fields.insert("created_date", created_date);
    fields.insert("is_archived", summary.is_archived.to_string());
    fields.insert("num_members", summary.num_members.to_string());
    fields.insert("purpose", summary.purpose.clone());
    fields.insert("topic", summary.topic.clone());
    fields.insert("last_update", summary.last_update.clone());
    fields.insert("icon", summary.icon.emoji());
    fields
}

fn render_value(value: &Value, fields: &Fields) -> Result<Value, ReportError> {
    Ok(match value {
        Value::String(s) => Value::String(substitute(s, fields)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_value(item, fields))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(map) => {
            let mut rendered = serde_json::Map::with_capacity(map.len());
            for (key, item) in map {
                rendered.insert(key.clone(), render_value(item, fields)?);
            }
            Value::Object(rendered)
        }
        other => other.clone(),
    })
}

fn substitute(text: &str, fields: &Fields) -> Result<String, ReportError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let replacement = fields.get(name.as_str()).ok_or_else(|| {
            ReportError::TemplateError(format!("unknown placeholder '{}'", whole.as_str()))
        })?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(replacement);
        last = whole.end();
    }
    out.push_str(&text[last..]);

    Ok(out)
}
