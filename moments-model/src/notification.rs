//! Notification model.
//!
//! Notifications are declared in config and scheduled by the platform layer.
//! Parsing goes through a wire struct whose optional fields keep "unset"
//! distinct from zero values, then applies defaults, then validates.

use crate::condition::Condition;
use crate::delivery::{DeliveryTime, JsonDeliveryTime};
use crate::error::{ModelError, ModelResult};
use crate::parse_mode::{ParseMode, null_as_default};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Prefix of [`Notification::unique_id`].
pub const NOTIFICATION_UNIQUE_ID_PREFIX: &str = "io.moments.notifications.";

/// First minute of the default delivery window (00:00).
pub const DEFAULT_WINDOW_START_MINUTES: u32 = 0;
/// Last minute of the default delivery window (23:59).
pub const DEFAULT_WINDOW_END_MINUTES: u32 = 23 * 60 + 59;

const DAY_NAMES: [(Weekday, &str); 7] = [
    (Weekday::Sun, "Sunday"),
    (Weekday::Mon, "Monday"),
    (Weekday::Tue, "Tuesday"),
    (Weekday::Wed, "Wednesday"),
    (Weekday::Thu, "Thursday"),
    (Weekday::Fri, "Friday"),
    (Weekday::Sat, "Saturday"),
];

/// Interruption level, mirroring the platform notification APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterruptionLevel {
    Active,
    Critical,
    Passive,
    TimeSensitive,
}

impl InterruptionLevel {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "critical" => Some(Self::Critical),
            "passive" => Some(Self::Passive),
            "timeSensitive" => Some(Self::TimeSensitive),
            _ => None,
        }
    }
}

/// Days a notification may be delivered on, canonically ordered Sunday first
/// and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaysOfWeek(Vec<Weekday>);

impl Default for DaysOfWeek {
    fn default() -> Self {
        Self::all()
    }
}

impl DaysOfWeek {
    #[must_use]
    pub fn all() -> Self {
        Self(DAY_NAMES.iter().map(|(day, _)| *day).collect())
    }

    /// Builds a set from any list of days, deduplicating and ordering it.
    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        let requested: Vec<Weekday> = days.into_iter().collect();
        Self(
            DAY_NAMES
                .iter()
                .map(|(day, _)| *day)
                .filter(|day| requested.contains(day))
                .collect(),
        )
    }

    /// Parses a comma-separated list of English day names ("Monday,Friday").
    ///
    /// Unknown names are an error in strict mode and dropped with a warning
    /// otherwise.
    pub fn parse(list: &str, mode: ParseMode) -> ModelResult<Self> {
        let mut days = Vec::new();
        for component in list.split(',').map(str::trim) {
            match DAY_NAMES.iter().find(|(_, name)| *name == component) {
                Some((day, _)) => days.push(*day),
                None if mode.is_strict() => {
                    return Err(ModelError::invalid(format!(
                        "Invalid deliveryDaysOfWeek entry \"{component}\". Expected day names like Monday,Tuesday."
                    )));
                }
                None => warn!("Ignoring unknown deliveryDaysOfWeek entry \"{}\"", component),
            }
        }
        Ok(Self::from_days(days))
    }

    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How long to wait for `condition` before delivering anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxWait {
    /// Never give up waiting; only a cancellation event ends the wait.
    Forever,
    Seconds(u32),
}

impl MaxWait {
    /// Maps the wire value: `-1` is forever, positive is seconds, anything
    /// else is rejected.
    pub fn from_wire(secs: i64) -> ModelResult<Self> {
        match secs {
            -1 => Ok(Self::Forever),
            s if s > 0 => u32::try_from(s)
                .map(Self::Seconds)
                .map_err(|_| ModelError::invalid(format!("maxWaitTime {s} is too large."))),
            _ => Err(ModelError::invalid(
                "Notifications must have a max wait time for ideal delivery condition. Valid values are -1 (forever) or values greater than 0.",
            )),
        }
    }
}

/// Defers delivery until `condition` holds or `max_wait` elapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealDeliveryConditions {
    pub condition: Condition,
    pub max_wait: MaxWait,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonIdealDeliveryConditions {
    #[serde(default, deserialize_with = "null_as_default")]
    condition: String,
    #[serde(default, deserialize_with = "null_as_default")]
    max_wait_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Assigned from the config's notification map key; empty while parsing.
    pub id: String,
    pub title: String,
    pub body: String,
    pub badge_count: Option<u32>,
    pub tap_action_name: Option<String>,
    pub sound: Option<String>,
    pub launch_image_name: Option<String>,
    pub relevance_score: Option<f64>,
    pub interruption_level: Option<InterruptionLevel>,
    pub delivery_time: DeliveryTime,
    pub delivery_days_of_week: DaysOfWeek,
    pub delivery_window_start_minutes: u32,
    pub delivery_window_end_minutes: u32,
    pub ideal_delivery_conditions: Option<IdealDeliveryConditions>,
    pub cancelation_events: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonNotification {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    body: String,
    badge_count: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    tap_action_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    sound: String,
    #[serde(default, deserialize_with = "null_as_default")]
    launch_image_name: String,
    relevance_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    interruption_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    delivery_time: JsonDeliveryTime,
    #[serde(default, deserialize_with = "null_as_default")]
    delivery_days_of_week: String,
    #[serde(default, deserialize_with = "null_as_default")]
    delivery_time_of_day_start: String,
    #[serde(default, deserialize_with = "null_as_default")]
    delivery_time_of_day_end: String,
    ideal_delivery_conditions: Option<JsonIdealDeliveryConditions>,
    cancelation_events: Option<Vec<String>>,
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Parses `HH:MM` (24-hour, zero padding optional) into minutes after
/// midnight.
#[must_use]
pub fn parse_time_of_day(s: &str) -> Option<u32> {
    let (hours, minutes) = s.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

fn parse_window_bound(
    field: &str,
    raw: &str,
    default: u32,
    mode: ParseMode,
) -> ModelResult<u32> {
    if raw.is_empty() {
        return Ok(default);
    }
    match parse_time_of_day(raw) {
        Some(minutes) => Ok(minutes),
        None if mode.is_strict() => Err(ModelError::invalid(format!(
            "Invalid {field}. Expect HH:MM format. Was: {raw}"
        ))),
        None => {
            warn!("Invalid {} [{}]. Using default: {}", field, raw, default);
            Ok(default)
        }
    }
}

impl Notification {
    /// Parses one notification object. The ID is left empty for the owning
    /// config to assign.
    pub fn from_value(value: serde_json::Value, mode: ParseMode) -> ModelResult<Self> {
        let wire: JsonNotification = serde_json::from_value(value).map_err(|e| {
            ModelError::malformed(
                "Unable to parse the json of a notification. Check the format, variable names, and types (eg float vs int).",
                e,
            )
        })?;

        let badge_count = match wire.badge_count {
            None => None,
            Some(count) => match u32::try_from(count) {
                Ok(count) => Some(count),
                Err(_) if mode.is_strict() => {
                    return Err(ModelError::invalid(
                        "Notification badgeCount must be greater than or equal to 0",
                    ));
                }
                Err(_) => {
                    warn!("Ignoring out of range notification badgeCount {}", count);
                    None
                }
            },
        };

        let interruption_level = match wire.interruption_level.as_str() {
            "" => None,
            raw => match InterruptionLevel::parse(raw) {
                Some(level) => Some(level),
                None if mode.is_strict() => {
                    return Err(ModelError::invalid(format!(
                        "Interruption level must be one of [active, critical, passive, timeSensitive], got {raw}"
                    )));
                }
                None => {
                    warn!("Ignoring unknown interruption level \"{}\"", raw);
                    None
                }
            },
        };

        let delivery_days_of_week = if wire.delivery_days_of_week.is_empty() {
            DaysOfWeek::all()
        } else {
            DaysOfWeek::parse(&wire.delivery_days_of_week, mode)?
        };

        // A half-specified window is rejected in every mode.
        if wire.delivery_time_of_day_start.is_empty() != wire.delivery_time_of_day_end.is_empty() {
            return Err(ModelError::invalid(
                "DeliveryTime must have both deliveryTimeOfDayStart and deliveryTimeOfDayEnd defined if either is defined.",
            ));
        }
        let delivery_window_start_minutes = parse_window_bound(
            "deliveryTimeOfDayStart",
            &wire.delivery_time_of_day_start,
            DEFAULT_WINDOW_START_MINUTES,
            mode,
        )?;
        let delivery_window_end_minutes = parse_window_bound(
            "deliveryTimeOfDayEnd",
            &wire.delivery_time_of_day_end,
            DEFAULT_WINDOW_END_MINUTES,
            mode,
        )?;

        let ideal_delivery_conditions = wire
            .ideal_delivery_conditions
            .map(|ideal| -> ModelResult<IdealDeliveryConditions> {
                Ok(IdealDeliveryConditions {
                    condition: Condition::new(ideal.condition),
                    max_wait: MaxWait::from_wire(ideal.max_wait_time)?,
                })
            })
            .transpose()?;

        let notification = Self {
            id: String::new(),
            title: wire.title,
            body: wire.body,
            badge_count,
            tap_action_name: non_empty(wire.tap_action_name),
            sound: non_empty(wire.sound),
            launch_image_name: non_empty(wire.launch_image_name),
            relevance_score: wire.relevance_score,
            interruption_level,
            delivery_time: DeliveryTime::from_json(wire.delivery_time, mode)?,
            delivery_days_of_week,
            delivery_window_start_minutes,
            delivery_window_end_minutes,
            ideal_delivery_conditions,
            cancelation_events: wire.cancelation_events,
        };
        notification.validate_ignoring_id()?;
        Ok(notification)
    }

    /// Full validation, including the assigned ID.
    pub fn validate(&self) -> ModelResult<()> {
        if self.id.is_empty() {
            return Err(ModelError::invalid("Notification must have ID"));
        }
        self.validate_ignoring_id()
    }

    /// Validation for a notification whose ID has not been assigned yet.
    pub fn validate_ignoring_id(&self) -> ModelResult<()> {
        if self.title.is_empty() && self.body.is_empty() && self.badge_count.is_none() {
            return Err(ModelError::invalid(
                "Notifications must have one or more of: title, body, and badgeCount.",
            ));
        }
        if self.delivery_window_start_minutes > DEFAULT_WINDOW_END_MINUTES {
            return Err(ModelError::invalid(
                "Notifications must have a deliveryTimeOfDayStart between 0 and 24*60 mins.",
            ));
        }
        if self.delivery_window_end_minutes > DEFAULT_WINDOW_END_MINUTES {
            return Err(ModelError::invalid(
                "Notifications must have a deliveryTimeOfDayEnd between 0 and 24*60 mins.",
            ));
        }
        if self.delivery_window_start_minutes > self.delivery_window_end_minutes {
            return Err(ModelError::invalid(
                "Notifications must have a deliveryTimeOfDayStart before deliveryTimeOfDayEnd.",
            ));
        }
        if self.delivery_days_of_week.is_empty() {
            return Err(ModelError::invalid(
                "Notifications must have at least one day of week valid for delivery.",
            ));
        }
        if let Some(score) = self.relevance_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(ModelError::invalid(
                    "Relevance score must be between 0 and 1 if provided.",
                ));
            }
        }
        if let Some(events) = &self.cancelation_events {
            if events.iter().any(String::is_empty) {
                return Err(ModelError::invalid(format!(
                    "Notification '{}' has a blank cancelation event",
                    self.id
                )));
            }
        }
        if let Some(ideal) = &self.ideal_delivery_conditions {
            ideal
                .condition
                .validate()
                .map_err(|e| e.context("Notification has invalid ideal delivery condition"))?;
        }
        self.delivery_time
            .validate()
            .map_err(|e| e.context("Notification has invalid delivery time"))?;
        Ok(())
    }

    /// Globally unique ID used when scheduling with the platform.
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("{NOTIFICATION_UNIQUE_ID_PREFIX}{}", self.id)
    }

    /// Action names this notification can trigger when tapped.
    pub fn embedded_action_names(&self) -> Vec<&str> {
        self.tap_action_name.as_deref().into_iter().collect()
    }
}
