use chrono::Weekday;
use moments_model::{
    DaysOfWeek, DeliveryTime, EventInstance, InterruptionLevel, MaxWait, Notification, ParseMode,
    parse_time_of_day,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn parse(value: serde_json::Value, mode: ParseMode) -> Result<Notification, String> {
    Notification::from_value(value, mode).map_err(|e| e.to_string())
}

fn minimal() -> serde_json::Value {
    json!({"title": "Hi", "deliveryTime": {"timestamp": 1_700_000_000}})
}

fn with(field: &str, value: serde_json::Value) -> serde_json::Value {
    let mut n = minimal();
    n[field] = value;
    n
}

// ── parsing ──────────────────────────────────────────────────────

#[test]
fn maximal_notification_parses_and_revalidates() {
    let mut parsed = parse(
        json!({
            "title": "Come back",
            "body": "Your streak is about to end",
            "badgeCount": 2,
            "tapActionName": "open_streak",
            "sound": "chime.caf",
            "launchImageName": "launch",
            "relevanceScore": 0.8,
            "interruptionLevel": "timeSensitive",
            "deliveryTime": {"eventName": "app_entered_background", "eventOffset": 3600, "eventInstance": "first"},
            "deliveryDaysOfWeek": "Friday,Monday",
            "deliveryTimeOfDayStart": "09:00",
            "deliveryTimeOfDayEnd": "21:30",
            "idealDeliveryConditions": {"condition": "user_signed_in", "maxWaitTime": 600},
            "cancelationEvents": ["opened_app"]
        }),
        ParseMode::Strict,
    )
    .unwrap();

    assert_eq!(parsed.badge_count, Some(2));
    assert_eq!(parsed.tap_action_name.as_deref(), Some("open_streak"));
    assert_eq!(parsed.interruption_level, Some(InterruptionLevel::TimeSensitive));
    assert_eq!(
        parsed.delivery_time,
        DeliveryTime {
            timestamp: None,
            event_name: Some("app_entered_background".into()),
            event_offset: Some(3600),
            event_instance: EventInstance::First,
        }
    );
    assert_eq!(
        parsed.delivery_days_of_week,
        DaysOfWeek::from_days([Weekday::Mon, Weekday::Fri])
    );
    assert_eq!(parsed.delivery_window_start_minutes, 540);
    assert_eq!(parsed.delivery_window_end_minutes, 1290);
    assert_eq!(
        parsed.ideal_delivery_conditions.as_ref().map(|i| i.max_wait),
        Some(MaxWait::Seconds(600))
    );
    assert_eq!(parsed.embedded_action_names(), vec!["open_streak"]);

    assert!(parsed.validate_ignoring_id().is_ok());
    assert_eq!(parsed.validate().unwrap_err().to_string(), "Notification must have ID");
    parsed.id = "streak".into();
    assert!(parsed.validate().is_ok());
    assert_eq!(parsed.unique_id(), "io.moments.notifications.streak");
}

#[test]
fn defaults_apply_when_unset() {
    let parsed = parse(minimal(), ParseMode::Strict).unwrap();
    assert_eq!(parsed.delivery_days_of_week, DaysOfWeek::all());
    assert_eq!(parsed.delivery_window_start_minutes, 0);
    assert_eq!(parsed.delivery_window_end_minutes, 1439);
    assert_eq!(parsed.badge_count, None);
    assert_eq!(parsed.tap_action_name, None);
    assert_eq!(parsed.interruption_level, None);
    assert_eq!(parsed.delivery_time.event_instance, EventInstance::Latest);
}

#[test]
fn notification_without_content_fails() {
    let err = parse(json!({"deliveryTime": {"timestamp": 1}}), ParseMode::Lenient).unwrap_err();
    assert_eq!(
        err,
        "Notifications must have one or more of: title, body, and badgeCount."
    );
}

#[test]
fn badge_only_notification_is_valid() {
    let parsed = parse(
        json!({"badgeCount": 0, "deliveryTime": {"timestamp": 1}}),
        ParseMode::Strict,
    )
    .unwrap();
    assert_eq!(parsed.badge_count, Some(0));
}

#[test]
fn null_fields_read_as_unset() {
    let parsed = parse(
        json!({
            "title": "t",
            "body": null,
            "sound": null,
            "deliveryDaysOfWeek": null,
            "deliveryTime": {"timestamp": 1_700_000_000}
        }),
        ParseMode::Strict,
    )
    .unwrap();
    assert_eq!(parsed.body, "");
    assert_eq!(parsed.sound, None);
    assert_eq!(parsed.delivery_days_of_week, DaysOfWeek::all());
}

#[test]
fn missing_delivery_time_fails() {
    assert_eq!(
        parse(json!({"title": "t"}), ParseMode::Lenient).unwrap_err(),
        "Notification has invalid delivery time: DeliveryTime must have either a Timestamp or an EventName defined."
    );
}

#[test]
fn conflicting_delivery_time_fails() {
    let err = parse(
        with("deliveryTime", json!({"timestamp": 5, "eventName": "app_start"})),
        ParseMode::Lenient,
    )
    .unwrap_err();
    assert!(err.ends_with("DeliveryTime cannot have both a Timestamp and an EventName defined."));
    let err = parse(
        with("deliveryTime", json!({"timestamp": 5, "eventOffset": 10})),
        ParseMode::Lenient,
    )
    .unwrap_err();
    assert!(err.ends_with("DeliveryTime cannot have both a Timestamp and an EventOffset defined."));
}

#[test]
fn out_of_range_event_offset_fails_at_parse() {
    for mode in [ParseMode::Strict, ParseMode::Lenient] {
        let err = parse(
            with(
                "deliveryTime",
                json!({"eventName": "app_start", "eventOffset": 9_300_000_000_000_000_i64}),
            ),
            mode,
        )
        .unwrap_err();
        assert!(
            err.ends_with("DeliveryTime eventOffset 9300000000000000 is out of range."),
            "{err}"
        );
    }
}

// ── delivery window ──────────────────────────────────────────────

#[test]
fn half_specified_window_fails_in_both_modes() {
    for mode in [ParseMode::Strict, ParseMode::Lenient] {
        let err = parse(with("deliveryTimeOfDayStart", json!("09:00")), mode).unwrap_err();
        assert_eq!(
            err,
            "DeliveryTime must have both deliveryTimeOfDayStart and deliveryTimeOfDayEnd defined if either is defined."
        );
    }
}

#[test]
fn inverted_window_fails_in_both_modes() {
    for mode in [ParseMode::Strict, ParseMode::Lenient] {
        let mut n = minimal();
        n["deliveryTimeOfDayStart"] = json!("20:00");
        n["deliveryTimeOfDayEnd"] = json!("08:00");
        assert_eq!(
            parse(n, mode).unwrap_err(),
            "Notifications must have a deliveryTimeOfDayStart before deliveryTimeOfDayEnd."
        );
    }
}

#[test]
fn malformed_time_of_day_strict_fails_lenient_defaults() {
    let mut n = minimal();
    n["deliveryTimeOfDayStart"] = json!("9am");
    n["deliveryTimeOfDayEnd"] = json!("18:00");
    assert_eq!(
        parse(n.clone(), ParseMode::Strict).unwrap_err(),
        "Invalid deliveryTimeOfDayStart. Expect HH:MM format. Was: 9am"
    );
    let lenient = parse(n, ParseMode::Lenient).unwrap();
    assert_eq!(lenient.delivery_window_start_minutes, 0);
    assert_eq!(lenient.delivery_window_end_minutes, 1080);
}

#[test]
fn time_of_day_parsing() {
    assert_eq!(parse_time_of_day("00:00"), Some(0));
    assert_eq!(parse_time_of_day("23:59"), Some(1439));
    assert_eq!(parse_time_of_day("7:05"), Some(425));
    assert_eq!(parse_time_of_day("24:00"), None);
    assert_eq!(parse_time_of_day("12:60"), None);
    assert_eq!(parse_time_of_day("abc"), None);
    assert_eq!(parse_time_of_day("12"), None);
    assert_eq!(parse_time_of_day("-1:30"), None);
}

// ── days of week ─────────────────────────────────────────────────

#[test]
fn days_dedup_in_canonical_order() {
    let days = DaysOfWeek::parse("Monday,Tuesday,Monday", ParseMode::Strict).unwrap();
    assert_eq!(days.iter().collect::<Vec<_>>(), vec![Weekday::Mon, Weekday::Tue]);

    let days = DaysOfWeek::parse("Saturday, Sunday", ParseMode::Strict).unwrap();
    assert_eq!(days.iter().collect::<Vec<_>>(), vec![Weekday::Sun, Weekday::Sat]);
}

#[test]
fn unknown_day_strict_fails_lenient_drops() {
    assert!(DaysOfWeek::parse("Monday,Funday", ParseMode::Strict).is_err());
    let days = DaysOfWeek::parse("Monday,Funday", ParseMode::Lenient).unwrap();
    assert_eq!(days.iter().collect::<Vec<_>>(), vec![Weekday::Mon]);
}

#[test]
fn no_valid_days_fails() {
    let err = parse(with("deliveryDaysOfWeek", json!("Funday")), ParseMode::Lenient).unwrap_err();
    assert_eq!(
        err,
        "Notifications must have at least one day of week valid for delivery."
    );
}

// ── lenient coercions ────────────────────────────────────────────

#[test]
fn negative_badge_strict_fails_lenient_unsets() {
    assert_eq!(
        parse(with("badgeCount", json!(-1)), ParseMode::Strict).unwrap_err(),
        "Notification badgeCount must be greater than or equal to 0"
    );
    let lenient = parse(with("badgeCount", json!(-1)), ParseMode::Lenient).unwrap();
    assert_eq!(lenient.badge_count, None);
}

#[test]
fn unknown_interruption_level_strict_fails_lenient_unsets() {
    assert!(parse(with("interruptionLevel", json!("urgent")), ParseMode::Strict).is_err());
    let lenient = parse(with("interruptionLevel", json!("urgent")), ParseMode::Lenient).unwrap();
    assert_eq!(lenient.interruption_level, None);
}

#[test]
fn unknown_event_instance_strict_fails_lenient_latest() {
    let n = with(
        "deliveryTime",
        json!({"eventName": "app_start", "eventInstance": "middle"}),
    );
    assert_eq!(
        parse(n.clone(), ParseMode::Strict).unwrap_err(),
        "Notification event instance must be 'first' or 'latest', got 'middle'"
    );
    let lenient = parse(n, ParseMode::Lenient).unwrap();
    assert_eq!(lenient.delivery_time.event_instance, EventInstance::Latest);
}

// ── other validation ─────────────────────────────────────────────

#[test]
fn relevance_score_range() {
    assert_eq!(
        parse(with("relevanceScore", json!(1.5)), ParseMode::Lenient).unwrap_err(),
        "Relevance score must be between 0 and 1 if provided."
    );
    assert!(parse(with("relevanceScore", json!(1.0)), ParseMode::Strict).is_ok());
}

#[test]
fn blank_cancelation_event_fails() {
    assert!(parse(with("cancelationEvents", json!(["ok", ""])), ParseMode::Lenient).is_err());
}

#[test]
fn max_wait_values() {
    let ideal = |wait: i64| {
        with(
            "idealDeliveryConditions",
            json!({"condition": "user_signed_in", "maxWaitTime": wait}),
        )
    };
    let err = parse(ideal(0), ParseMode::Lenient).unwrap_err();
    assert!(err.contains("Valid values are -1 (forever) or values greater than 0."), "{err}");
    assert!(parse(ideal(-2), ParseMode::Lenient).is_err());
    assert_eq!(
        parse(ideal(-1), ParseMode::Strict)
            .unwrap()
            .ideal_delivery_conditions
            .map(|i| i.max_wait),
        Some(MaxWait::Forever)
    );
    assert_eq!(
        parse(ideal(1), ParseMode::Strict)
            .unwrap()
            .ideal_delivery_conditions
            .map(|i| i.max_wait),
        Some(MaxWait::Seconds(1))
    );
}

#[test]
fn invalid_ideal_condition_fails() {
    let err = parse(
        with(
            "idealDeliveryConditions",
            json!({"condition": "(a", "maxWaitTime": 10}),
        ),
        ParseMode::Lenient,
    )
    .unwrap_err();
    assert_eq!(
        err,
        "Notification has invalid ideal delivery condition: Condition has unbalanced parentheses"
    );
}

proptest! {
    #[test]
    fn max_wait_accepts_only_forever_or_positive(secs in -100i64..100_000) {
        let result = MaxWait::from_wire(secs);
        prop_assert_eq!(result.is_ok(), secs == -1 || secs > 0);
    }

    #[test]
    fn every_valid_time_of_day_round_trips(h in 0u32..24, m in 0u32..60) {
        prop_assert_eq!(parse_time_of_day(&format!("{h:02}:{m:02}")), Some(h * 60 + m));
    }

    #[test]
    fn out_of_range_time_of_day_rejected(h in 24u32..100, m in 60u32..100) {
        prop_assert_eq!(parse_time_of_day(&format!("{h}:00")), None);
        prop_assert_eq!(parse_time_of_day(&format!("00:{m}")), None);
    }
}
