//! Data model for the Moments decision core.
//!
//! This crate owns everything that comes out of the remote config document:
//! - [`event`]: the built-in / well-known / custom event taxonomy
//! - [`Action`]: the closed set of effects (alerts, links) and their parsing
//! - [`Notification`]: notification content, delivery time and window
//! - [`resolver`]: turning a notification into a [`DeliveryPlan`]
//! - [`PrimaryConfig`]: the validated root tying them together
//!
//! All parsing takes an explicit [`ParseMode`]. Errors are [`ModelError`]s,
//! whose messages are meant for whoever maintains the remote config.

mod action;
mod alert;
mod condition;
mod config;
mod delivery;
mod error;
pub mod event;
mod link;
mod notification;
mod parse_mode;
pub mod resolver;
mod theme;

pub use action::{Action, ActionBindings, ActionKind, BindingError};
pub use alert::{AlertAction, AlertCustomButton, AlertStyle, ButtonStyle};
pub use condition::Condition;
pub use config::{CONFIG_VERSION_V1, PrimaryConfig, Trigger};
pub use delivery::{DeliveryTime, EventInstance};
pub use error::{EventError, EventResult, ModelError, ModelResult};
pub use event::{Event, EventKind};
pub use link::LinkAction;
pub use notification::{
    DEFAULT_WINDOW_END_MINUTES, DEFAULT_WINDOW_START_MINUTES, DaysOfWeek, IdealDeliveryConditions,
    InterruptionLevel, MaxWait, NOTIFICATION_UNIQUE_ID_PREFIX, Notification, parse_time_of_day,
};
pub use parse_mode::ParseMode;
pub use resolver::{DeliveryBasis, DeliveryDecision, DeliveryObservation, DeliveryPlan, DeliveryWindow};
pub use theme::Theme;
