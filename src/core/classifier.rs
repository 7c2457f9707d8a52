//! Freshness classification for a single channel.
//!
//! Two rules decide the icon. The recency rule buckets the age of the last
//! activity; the freshness rule then forces `sunrise_over_mountains` for any
//! channel created less than [`NEW_CHANNEL_DAYS`] days ago. Only the icon is
//! overridden, the last-update text always reflects the recency rule.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::models::{
    ChannelRecord, ChannelSummary, NOT_SET_TEXT, StatusIcon, UNKNOWN_LAST_UPDATE_TEXT,
};

/// Channels younger than this many days are always shown as new.
pub const NEW_CHANNEL_DAYS: i64 = 14;

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days elapsed from `earlier` to `now`, rounded toward negative infinity.
#[must_use]
pub fn elapsed_days(earlier: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - earlier).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Build the summary for `channel`.
///
/// `now` is the single clock reading for the whole run; both the activity age
/// and the channel age are measured against it. `time_zone` only affects how
/// the last-update date is printed.
#[must_use]
pub fn classify(
    channel: &ChannelRecord,
    last_update: Option<DateTime<Utc>>,
    time_zone: Tz,
    now: DateTime<Utc>,
) -> ChannelSummary {
    let (last_update_text, mut icon) = match last_update {
        Some(ts) => {
            let age = elapsed_days(ts, now);
            let date = ts.with_timezone(&time_zone).format("%Y-%m-%d");
            (format!("{date} ({age} 日前)"), StatusIcon::from_age_days(age))
        }
        None => (UNKNOWN_LAST_UPDATE_TEXT.to_string(), StatusIcon::Question),
    };

    let channel_age_secs = now.timestamp().saturating_sub(channel.created);
    if channel_age_secs.div_euclid(SECONDS_PER_DAY) < NEW_CHANNEL_DAYS {
        icon = StatusIcon::SunriseOverMountains;
    }

    ChannelSummary {
        id: channel.id.clone(),
        name: channel.name.clone(),
        created: channel.created,
        is_archived: channel.is_archived,
        num_members: channel.num_members,
        purpose: text_or_not_set(&channel.purpose),
        topic: text_or_not_set(&channel.topic),
        last_update: last_update_text,
        icon,
    }
}

fn text_or_not_set(value: &str) -> String {
    if value.is_empty() {
        NOT_SET_TEXT.to_string()
    } else {
        value.to_string()
    }
}
