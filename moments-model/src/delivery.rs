use crate::error::{ModelError, ModelResult};
use crate::parse_mode::ParseMode;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which occurrence of the trigger event a notification is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventInstance {
    /// The most recent occurrence at evaluation time.
    #[default]
    Latest,
    /// The earliest recorded occurrence.
    First,
}

/// When a notification should be delivered.
///
/// Exactly one of `timestamp` or `event_name` is set. `event_offset` (seconds)
/// only combines with `event_name`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTime {
    /// Unix epoch seconds.
    pub timestamp: Option<i64>,
    pub event_name: Option<String>,
    pub event_offset: Option<i64>,
    pub event_instance: EventInstance,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonDeliveryTime {
    timestamp: Option<i64>,
    event_name: Option<String>,
    event_offset: Option<i64>,
    event_instance: Option<String>,
}

impl DeliveryTime {
    pub(crate) fn from_json(wire: JsonDeliveryTime, mode: ParseMode) -> ModelResult<Self> {
        let event_instance = match wire.event_instance.as_deref() {
            None | Some("" | "latest") => EventInstance::Latest,
            Some("first") => EventInstance::First,
            Some(other) if mode.is_strict() => {
                return Err(ModelError::invalid(format!(
                    "Notification event instance must be 'first' or 'latest', got '{other}'"
                )));
            }
            Some(other) => {
                warn!("Unknown notification event instance '{}', using 'latest'", other);
                EventInstance::Latest
            }
        };

        Ok(Self {
            timestamp: wire.timestamp,
            event_name: wire.event_name,
            event_offset: wire.event_offset,
            event_instance,
        })
    }

    pub fn validate(&self) -> ModelResult<()> {
        match (&self.timestamp, &self.event_name) {
            (None, None) => {
                return Err(ModelError::invalid(
                    "DeliveryTime must have either a Timestamp or an EventName defined.",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(ModelError::invalid(
                    "DeliveryTime cannot have both a Timestamp and an EventName defined.",
                ));
            }
            (None, Some(name)) if name.is_empty() => {
                return Err(ModelError::invalid("DeliveryTime EventName can not be blank."));
            }
            _ => {}
        }
        if self.timestamp.is_some() && self.event_offset.is_some() {
            return Err(ModelError::invalid(
                "DeliveryTime cannot have both a Timestamp and an EventOffset defined.",
            ));
        }
        if let Some(offset) = self.event_offset {
            if TimeDelta::try_seconds(offset).is_none() {
                return Err(ModelError::invalid(format!(
                    "DeliveryTime eventOffset {offset} is out of range."
                )));
            }
        }
        if let Some(ts) = self.timestamp {
            if DateTime::<Utc>::from_timestamp(ts, 0).is_none() {
                return Err(ModelError::invalid(format!(
                    "DeliveryTime timestamp {ts} is out of range."
                )));
            }
        }
        Ok(())
    }

    /// The absolute delivery instant, for timestamp-based delivery.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    }
}
