use channel_forecast::core::classifier::classify;
use channel_forecast::core::models::{ChannelRecord, StatusIcon};
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;

const TOKYO: Tz = chrono_tz::Asia::Tokyo;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap()
}

fn channel_created_days_ago(days: i64) -> ChannelRecord {
    ChannelRecord {
        id: "C0001".to_string(),
        name: "general".to_string(),
        created: (now() - Duration::days(days)).timestamp(),
        is_archived: false,
        num_members: 12,
        topic: "daily chatter".to_string(),
        purpose: "company-wide announcements".to_string(),
    }
}

#[test]
fn test_age_buckets_use_inclusive_lower_bounds() {
    let channel = channel_created_days_ago(365);
    let cases = [
        (0, StatusIcon::Sunny),
        (9, StatusIcon::Sunny),
        (10, StatusIcon::SunSmallCloud),
        (19, StatusIcon::SunSmallCloud),
        (20, StatusIcon::SunBehindCloud),
        (29, StatusIcon::SunBehindCloud),
        (30, StatusIcon::Cloud),
        (44, StatusIcon::Cloud),
        (45, StatusIcon::RainCloud),
        (59, StatusIcon::RainCloud),
        (60, StatusIcon::ThunderCloudAndRain),
        (400, StatusIcon::ThunderCloudAndRain),
    ];

    for (age, expected) in cases {
        let summary = classify(&channel, Some(now() - Duration::days(age)), TOKYO, now());
        assert_eq!(summary.icon, expected, "age {age} days");
        assert!(
            summary.last_update.ends_with(&format!("({age} 日前)")),
            "age {age} days rendered as {}",
            summary.last_update
        );
    }
}

#[test]
fn test_partial_days_round_down() {
    let channel = channel_created_days_ago(365);
    let last = now() - Duration::days(10) + Duration::minutes(1);
    let summary = classify(&channel, Some(last), TOKYO, now());
    assert_eq!(summary.icon, StatusIcon::Sunny);
    assert!(summary.last_update.ends_with("(9 日前)"));
}

#[test]
fn test_unknown_last_update() {
    let summary = classify(&channel_created_days_ago(100), None, TOKYO, now());
    assert_eq!(summary.last_update, "不明");
    assert_eq!(summary.icon, StatusIcon::Question);
}

#[test]
fn test_unknown_last_update_on_new_channel() {
    let summary = classify(&channel_created_days_ago(3), None, TOKYO, now());
    assert_eq!(summary.last_update, "不明");
    assert_eq!(summary.icon, StatusIcon::SunriseOverMountains);
}

#[test]
fn test_new_channel_override_keeps_last_update_text() {
    let last = now() - Duration::days(50);
    let summary = classify(&channel_created_days_ago(5), Some(last), TOKYO, now());
    assert_eq!(summary.icon, StatusIcon::SunriseOverMountains);
    assert_eq!(summary.last_update, "2024-04-12 (50 日前)");
}

#[test]
fn test_old_channel_recent_activity_is_sunny() {
    let last = now() - Duration::days(3);
    let summary = classify(&channel_created_days_ago(100), Some(last), TOKYO, now());
    assert_eq!(summary.icon, StatusIcon::Sunny);
    assert_eq!(summary.last_update, "2024-05-29 (3 日前)");
}

#[test]
fn test_new_channel_threshold_is_fourteen_days() {
    let mut channel = channel_created_days_ago(14);
    let last = Some(now() - Duration::days(70));
    assert_eq!(
        classify(&channel, last, TOKYO, now()).icon,
        StatusIcon::ThunderCloudAndRain
    );

    channel.created += 60;
    assert_eq!(
        classify(&channel, last, TOKYO, now()).icon,
        StatusIcon::SunriseOverMountains
    );
}

#[test]
fn test_last_update_date_is_printed_in_time_zone() {
    let channel = channel_created_days_ago(100);
    // 2024-05-31 20:00 UTC is already 2024-06-01 in Tokyo.
    let last = Utc.with_ymd_and_hms(2024, 5, 31, 20, 0, 0).unwrap();

    let tokyo = classify(&channel, Some(last), TOKYO, now());
    assert_eq!(tokyo.last_update, "2024-06-01 (0 日前)");

    let utc = classify(&channel, Some(last), chrono_tz::UTC, now());
    assert_eq!(utc.last_update, "2024-05-31 (0 日前)");
}

#[test]
fn test_purpose_and_topic_default_independently() {
    let mut channel = channel_created_days_ago(100);
    channel.purpose = String::new();
    let summary = classify(&channel, None, TOKYO, now());
    assert_eq!(summary.purpose, "未設定");
    assert_eq!(summary.topic, "daily chatter");

    channel.purpose = "\"release\" coordination & <notes>".to_string();
    channel.topic = String::new();
    let summary = classify(&channel, None, TOKYO, now());
    assert_eq!(summary.purpose, "\"release\" coordination & <notes>");
    assert_eq!(summary.topic, "未設定");
}

#[test]
fn test_fields_are_copied_through() {
    let mut channel = channel_created_days_ago(100);
    channel.num_members = 42;
    let summary = classify(&channel, None, TOKYO, now());
    assert_eq!(summary.id, channel.id);
    assert_eq!(summary.name, channel.name);
    assert_eq!(summary.created, channel.created);
    assert!(!summary.is_archived);
    assert_eq!(summary.num_members, 42);
}

#[test]
fn test_classification_is_deterministic_for_fixed_now() {
    let channel = channel_created_days_ago(30);
    let last = Some(now() - Duration::days(22));
    assert_eq!(
        classify(&channel, last, TOKYO, now()),
        classify(&channel, last, TOKYO, now())
    );
}

#[test]
fn test_icon_names_and_emoji() {
    assert_eq!(StatusIcon::SunSmallCloud.as_str(), "sun_small_cloud");
    assert_eq!(
        StatusIcon::ThunderCloudAndRain.emoji(),
        ":thunder_cloud_and_rain:"
    );
    assert_eq!(StatusIcon::Question.to_string(), "question");
}

#[test]
fn test_extreme_creation_times_do_not_overflow() {
    let mut channel = channel_created_days_ago(100);

    channel.created = i64::MIN;
    let summary = classify(&channel, None, TOKYO, now());
    assert_eq!(summary.icon, StatusIcon::Question);

    channel.created = i64::MAX;
    let summary = classify(&channel, None, TOKYO, now());
    assert_eq!(summary.icon, StatusIcon::SunriseOverMountains);
}
