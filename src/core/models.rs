use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown when a channel has no purpose or topic.
pub const NOT_SET_TEXT: &str = "未設定";

/// Placeholder shown when no qualifying message was found.
pub const UNKNOWN_LAST_UPDATE_TEXT: &str = "不明";

/// A channel as listed by `conversations.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: String,
    pub name: String,
    /// Creation time in epoch seconds.
    pub created: i64,
    pub is_archived: bool,
    pub num_members: u64,
    pub topic: String,
    pub purpose: String,
}

/// The subset of a `conversations.history` message the report looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub ts: String,
    pub subtype: Option<String>,
}

impl HistoryMessage {
    /// Messages carrying a subtype (joins, topic changes, bot events) are not activity.
    #[must_use]
    pub fn is_activity(&self) -> bool {
        self.subtype.is_none()
    }
}

/// Weather-style freshness tag for a channel, rendered as a Slack emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    Sunny,
    SunSmallCloud,
    SunBehindCloud,
    Cloud,
    RainCloud,
    ThunderCloudAndRain,
    Question,
    SunriseOverMountains,
}

impl StatusIcon {
    /// Bucket an activity age (whole days) into an icon.
    #[must_use]
    pub fn from_age_days(days: i64) -> Self {
        match days {
            d if d < 10 => StatusIcon::Sunny,
            d if d < 20 => StatusIcon::SunSmallCloud,
            d if d < 30 => StatusIcon::SunBehindCloud,
            d if d < 45 => StatusIcon::Cloud,
            d if d < 60 => StatusIcon::RainCloud,
            _ => StatusIcon::ThunderCloudAndRain,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatusIcon::Sunny => "sunny",
            StatusIcon::SunSmallCloud => "sun_small_cloud",
            StatusIcon::SunBehindCloud => "sun_behind_cloud",
            StatusIcon::Cloud => "cloud",
            StatusIcon::RainCloud => "rain_cloud",
            StatusIcon::ThunderCloudAndRain => "thunder_cloud_and_rain",
            StatusIcon::Question => "question",
            StatusIcon::SunriseOverMountains => "sunrise_over_mountains",
        }
    }

    /// Slack emoji shortcode, e.g. `:sunny:`.
    #[must_use]
    pub fn emoji(self) -> String {
        format!(":{}:", self.as_str())
    }
}

impl fmt::Display for StatusIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready summary of one channel, produced once per report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    pub created: i64,
    pub is_archived: bool,
    pub num_members: u64,
    pub purpose: String,
    pub topic: String,
    pub last_update: String,
    pub icon: StatusIcon,
}
