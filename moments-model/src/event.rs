//! Event taxonomy.
//!
//! Every event name falls into exactly one class:
//! - **Built-in**: lifecycle events the SDK itself emits (e.g. `app_start`)
//! - **Well-known**: events the SDK understands but the host emits (e.g. `signed_in`)
//! - **Custom**: anything else, as long as it stays out of the reserved namespaces
//!
//! The per-class constructors exist so a host can not fire a built-in
//! lifecycle hook through the custom-event path by accident.

use crate::error::{EventError, EventResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

pub const APP_START_EVENT: &str = "app_start";
pub const APP_ENTERED_FOREGROUND_EVENT: &str = "app_entered_foreground";
pub const APP_ENTERED_BACKGROUND_EVENT: &str = "app_entered_background";
pub const APP_LAUNCHED_FROM_NOTIFICATION_EVENT: &str = "app_launched_from_notification";

pub const SIGNED_IN_EVENT: &str = "signed_in";
pub const SIGNED_OUT_EVENT: &str = "signed_out";
pub const ACCOUNT_CREATED_EVENT: &str = "account_created";
pub const TUTORIAL_COMPLETED_EVENT: &str = "tutorial_completed";
pub const PURCHASE_COMPLETED_EVENT: &str = "purchase_completed";
pub const SHARE_COMPLETED_EVENT: &str = "share_completed";

/// Events emitted by the SDK itself.
pub const BUILT_IN_EVENTS: &[&str] = &[
    APP_START_EVENT,
    APP_ENTERED_FOREGROUND_EVENT,
    APP_ENTERED_BACKGROUND_EVENT,
    APP_LAUNCHED_FROM_NOTIFICATION_EVENT,
];

/// Events the SDK recognizes but the host application emits.
pub const WELL_KNOWN_EVENTS: &[&str] = &[
    SIGNED_IN_EVENT,
    SIGNED_OUT_EVENT,
    ACCOUNT_CREATED_EVENT,
    TUTORIAL_COMPLETED_EVENT,
    PURCHASE_COMPLETED_EVENT,
    SHARE_COMPLETED_EVENT,
];

/// Prefix reserved for future built-in events.
pub const BUILT_IN_NAMESPACE: &str = "io.moments.events.built_in.";
/// Prefix reserved for future well-known events.
pub const WELL_KNOWN_NAMESPACE: &str = "io.moments.events.well_known.";

static BUILT_IN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| BUILT_IN_EVENTS.iter().copied().collect());
static WELL_KNOWN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| WELL_KNOWN_EVENTS.iter().copied().collect());

/// The class of an event, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    BuiltIn,
    WellKnown,
    Custom,
}

/// Classifies an event name.
///
/// Fails only for empty names and for unknown names inside a reserved
/// namespace.
pub fn classify(name: &str) -> EventResult<EventKind> {
    if name.is_empty() {
        return Err(EventError::EmptyName);
    }
    if BUILT_IN_SET.contains(name) {
        return Ok(EventKind::BuiltIn);
    }
    if WELL_KNOWN_SET.contains(name) {
        return Ok(EventKind::WellKnown);
    }
    if name.starts_with(BUILT_IN_NAMESPACE) || name.starts_with(WELL_KNOWN_NAMESPACE) {
        return Err(EventError::ReservedNamespace(name.to_string()));
    }
    Ok(EventKind::Custom)
}

/// An immutable, classified event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Event {
    name: String,
    kind: EventKind,
}

impl Event {
    /// Creates an event, inferring its class from the name.
    pub fn new(name: impl Into<String>) -> EventResult<Self> {
        let name = name.into();
        let kind = classify(&name)?;
        Ok(Self { name, kind })
    }

    /// Creates a built-in event. Fails for any name outside the built-in set.
    pub fn built_in(name: impl Into<String>) -> EventResult<Self> {
        let name = name.into();
        match classify(&name)? {
            EventKind::BuiltIn => Ok(Self {
                name,
                kind: EventKind::BuiltIn,
            }),
            _ => Err(EventError::NotBuiltIn(name)),
        }
    }

    /// Creates a well-known event. Fails for any name outside the well-known set.
    pub fn well_known(name: impl Into<String>) -> EventResult<Self> {
        let name = name.into();
        match classify(&name)? {
            EventKind::WellKnown => Ok(Self {
                name,
                kind: EventKind::WellKnown,
            }),
            _ => Err(EventError::NotWellKnown(name)),
        }
    }

    /// Creates a custom event. Fails for built-in or well-known names and for
    /// names inside a reserved namespace.
    pub fn custom(name: impl Into<String>) -> EventResult<Self> {
        let name = name.into();
        match classify(&name)? {
            EventKind::Custom => Ok(Self {
                name,
                kind: EventKind::Custom,
            }),
            _ => Err(EventError::ReservedName(name)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
