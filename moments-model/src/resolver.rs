//! Delivery-time resolution.
//!
//! Turns a validated [`Notification`] into a [`DeliveryPlan`]: the scheduling
//! basis, the weekday/time-of-day window, the ideal delivery gate and the
//! cancellation events. The plan never reads event history itself. A
//! scheduler supplies occurrence times and condition results through a
//! [`DeliveryObservation`] and gets back a [`DeliveryDecision`].

use crate::delivery::{DeliveryTime, EventInstance};
use crate::error::{ModelError, ModelResult};
use crate::notification::{DaysOfWeek, IdealDeliveryConditions, MaxWait, Notification};
use chrono::{DateTime, Datelike, Days, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use serde::Serialize;

/// What a notification's fire time is measured from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliveryBasis {
    /// A fixed instant.
    Absolute { at: DateTime<Utc> },
    /// An occurrence of an event, plus an offset.
    EventRelative {
        event: String,
        instance: EventInstance,
        #[serde(rename = "offset_secs", serialize_with = "serialize_offset")]
        offset: TimeDelta,
    },
}

fn serialize_offset<S: serde::Serializer>(offset: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(offset.num_seconds())
}

impl DeliveryBasis {
    pub fn from_delivery_time(delivery_time: &DeliveryTime) -> ModelResult<Self> {
        delivery_time.validate()?;
        if let Some(at) = delivery_time.timestamp() {
            return Ok(Self::Absolute { at });
        }
        let event = delivery_time
            .event_name
            .clone()
            .ok_or_else(|| ModelError::invalid("DeliveryTime must have either a Timestamp or an EventName defined."))?;
        let offset = TimeDelta::try_seconds(delivery_time.event_offset.unwrap_or(0))
            .ok_or_else(|| ModelError::invalid("DeliveryTime eventOffset is out of range."))?;
        Ok(Self::EventRelative {
            event,
            instance: delivery_time.event_instance,
            offset,
        })
    }

    /// The raw candidate fire time, before the delivery window applies.
    ///
    /// `first` and `latest` are the occurrence times of the basis event, if it
    /// has occurred. Returns `None` while an event-relative basis is still
    /// waiting for its event.
    #[must_use]
    pub fn candidate(
        &self,
        first: Option<DateTime<Utc>>,
        latest: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        match self {
            Self::Absolute { at } => Some(*at),
            Self::EventRelative {
                instance, offset, ..
            } => {
                let occurrence = match instance {
                    EventInstance::First => first,
                    EventInstance::Latest => latest,
                }?;
                occurrence.checked_add_signed(*offset)
            }
        }
    }

    /// The event this basis waits on, if any.
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        match self {
            Self::Absolute { .. } => None,
            Self::EventRelative { event, .. } => Some(event),
        }
    }
}

/// Local weekdays and inclusive minute range a notification may fire in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryWindow {
    pub days: DaysOfWeek,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl DeliveryWindow {
    /// The earliest local time at or after `local` that falls on an allowed
    /// day inside the minute range.
    ///
    /// Returns `None` when no day is allowed or the range is inverted.
    #[must_use]
    pub fn next_allowed(&self, local: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.days.is_empty() || self.start_minutes > self.end_minutes {
            return None;
        }
        let start = NaiveTime::from_hms_opt(self.start_minutes / 60, self.start_minutes % 60, 0)?;
        let minute_of_day = local.hour() * 60 + local.minute();

        for offset in 0..=7u64 {
            let date = local.date().checked_add_days(Days::new(offset))?;
            if !self.days.contains(date.weekday()) {
                continue;
            }
            if offset > 0 {
                return Some(date.and_time(start));
            }
            if minute_of_day < self.start_minutes {
                return Some(date.and_time(start));
            }
            if minute_of_day <= self.end_minutes {
                return Some(local);
            }
        }
        None
    }

    /// Applies the window to a UTC candidate in the device time zone.
    ///
    /// A slot that falls into a DST gap moves forward an hour. If that lands
    /// outside the window or on another day, the search resumes at the next
    /// day. The result is never earlier than `candidate`.
    pub fn effective_time<Tz: TimeZone>(
        &self,
        candidate: DateTime<Utc>,
        tz: &Tz,
    ) -> Option<DateTime<Utc>> {
        let mut local = candidate.with_timezone(tz).naive_local();
        for _ in 0..=7 {
            let slot = self.next_allowed(local)?;
            if let Some(resolved) = tz.from_local_datetime(&slot).earliest() {
                return Some(resolved.with_timezone(&Utc).max(candidate));
            }
            let shifted = slot.checked_add_signed(TimeDelta::hours(1))?;
            if shifted.date() == slot.date() && self.contains_minute(&shifted) {
                if let Some(resolved) = tz.from_local_datetime(&shifted).earliest() {
                    return Some(resolved.with_timezone(&Utc).max(candidate));
                }
            }
            local = slot.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
        }
        None
    }

    fn contains_minute(&self, local: &NaiveDateTime) -> bool {
        let minute = local.hour() * 60 + local.minute();
        (self.start_minutes..=self.end_minutes).contains(&minute)
    }
}

/// Everything a scheduler needs to arm, re-arm or cancel one notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryPlan {
    pub notification_id: String,
    pub unique_id: String,
    pub basis: DeliveryBasis,
    pub window: DeliveryWindow,
    pub ideal_delivery: Option<IdealDeliveryConditions>,
    pub cancelation_events: Vec<String>,
}

/// What the scheduler has seen so far, as of `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryObservation {
    pub now: DateTime<Utc>,
    pub first_occurrence: Option<DateTime<Utc>>,
    pub latest_occurrence: Option<DateTime<Utc>>,
    /// Whether the ideal delivery condition currently evaluates true.
    pub condition_met: bool,
    /// Whether any cancellation event occurred since the plan was armed.
    pub cancelation_observed: bool,
}

impl DeliveryObservation {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            first_occurrence: None,
            latest_occurrence: None,
            condition_met: false,
            cancelation_observed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum DeliveryDecision {
    /// Arm a timer for `at`.
    Scheduled { at: DateTime<Utc> },
    /// The basis event has not occurred yet.
    AwaitingEvent,
    /// Due, but held back until the ideal condition holds. `give_up_at` is
    /// `None` when the wait is unbounded.
    WaitingForCondition { give_up_at: Option<DateTime<Utc>> },
    /// Deliver now.
    Fire,
    /// A cancellation event won the race. Permanent.
    Cancelled,
    /// No allowed delivery slot exists.
    Never,
}

impl DeliveryPlan {
    pub fn for_notification(notification: &Notification) -> ModelResult<Self> {
        Ok(Self {
            notification_id: notification.id.clone(),
            unique_id: notification.unique_id(),
            basis: DeliveryBasis::from_delivery_time(&notification.delivery_time)?,
            window: DeliveryWindow {
                days: notification.delivery_days_of_week.clone(),
                start_minutes: notification.delivery_window_start_minutes,
                end_minutes: notification.delivery_window_end_minutes,
            },
            ideal_delivery: notification.ideal_delivery_conditions.clone(),
            cancelation_events: notification.cancelation_events.clone().unwrap_or_default(),
        })
    }

    /// Whether an occurrence of `event_name` permanently cancels this plan.
    #[must_use]
    pub fn is_cancelled_by(&self, event_name: &str) -> bool {
        self.cancelation_events.iter().any(|e| e == event_name)
    }

    /// Decides what to do with this notification given what has been
    /// observed. `tz` is the device time zone the window is expressed in.
    pub fn decide<Tz: TimeZone>(&self, observed: &DeliveryObservation, tz: &Tz) -> DeliveryDecision {
        if observed.cancelation_observed {
            return DeliveryDecision::Cancelled;
        }
        let Some(candidate) = self
            .basis
            .candidate(observed.first_occurrence, observed.latest_occurrence)
        else {
            return DeliveryDecision::AwaitingEvent;
        };
        let Some(at) = self.window.effective_time(candidate, tz) else {
            return DeliveryDecision::Never;
        };
        if observed.now < at {
            return DeliveryDecision::Scheduled { at };
        }

        let Some(ideal) = &self.ideal_delivery else {
            return DeliveryDecision::Fire;
        };
        if observed.condition_met {
            return DeliveryDecision::Fire;
        }
        match ideal.max_wait {
            MaxWait::Forever => DeliveryDecision::WaitingForCondition { give_up_at: None },
            MaxWait::Seconds(secs) => {
                let Some(deadline) = at.checked_add_signed(TimeDelta::seconds(i64::from(secs)))
                else {
                    return DeliveryDecision::WaitingForCondition { give_up_at: None };
                };
                if observed.now >= deadline {
                    DeliveryDecision::Fire
                } else {
                    DeliveryDecision::WaitingForCondition {
                        give_up_at: Some(deadline),
                    }
                }
            }
        }
    }
}
