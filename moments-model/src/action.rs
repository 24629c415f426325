use crate::alert::AlertAction;
use crate::error::{ModelError, ModelResult};
use crate::link::LinkAction;
use crate::parse_mode::ParseMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A failure reported by the platform layer while performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BindingError(pub String);

impl BindingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The platform capabilities an action can call into.
///
/// Implementations render the effect; they must not call back into the
/// engine.
pub trait ActionBindings: Send + Sync {
    fn show_alert(&self, alert: &AlertAction) -> Result<(), BindingError>;

    fn open_link(&self, link: &LinkAction) -> Result<(), BindingError>;
}

/// Discriminant of [`Action`], matching the `actionType` wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Alert,
    Link,
}

impl ActionKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "alert" => Some(Self::Alert),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

/// A named effect from the config's action registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "actionType", content = "actionData", rename_all = "snake_case")]
pub enum Action {
    Alert(AlertAction),
    Link(LinkAction),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonAction {
    action_type: String,
    #[serde(default)]
    action_data: serde_json::Value,
}

impl Action {
    /// Parses an `{"actionType", "actionData"}` envelope.
    ///
    /// Returns `Ok(None)` for an unknown `actionType` in lenient mode, so a
    /// config written for a newer SDK still loads.
    pub fn from_value(value: serde_json::Value, mode: ParseMode) -> ModelResult<Option<Self>> {
        let wire: JsonAction = serde_json::from_value(value).map_err(|e| {
            ModelError::malformed(
                "Unable to parse an action. Actions must have an actionType and actionData.",
                e,
            )
        })?;

        let Some(kind) = ActionKind::parse(&wire.action_type) else {
            if mode.is_strict() {
                return Err(ModelError::invalid(format!(
                    "Unsupported action type: \"{}\"",
                    wire.action_type
                )));
            }
            warn!("Skipping action with unsupported type \"{}\"", wire.action_type);
            return Ok(None);
        };

        let action = match kind {
            ActionKind::Alert => Self::Alert(AlertAction::from_value(wire.action_data, mode)?),
            ActionKind::Link => Self::Link(LinkAction::from_value(wire.action_data, mode)?),
        };
        Ok(Some(action))
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Alert(_) => ActionKind::Alert,
            Self::Link(_) => ActionKind::Link,
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        match self {
            Self::Alert(alert) => alert.validate(),
            Self::Link(link) => link.validate(),
        }
    }

    /// Names of other actions this action can trigger.
    pub fn embedded_action_names(&self) -> Vec<&str> {
        match self {
            Self::Alert(alert) => alert.embedded_action_names(),
            Self::Link(_) => Vec::new(),
        }
    }

    /// Names of themes this action renders with.
    pub fn embedded_theme_names(&self) -> Vec<&str> {
        match self {
            Self::Alert(_) | Self::Link(_) => Vec::new(),
        }
    }

    /// Performs the action through the platform bindings.
    pub fn perform<B: ActionBindings + ?Sized>(&self, bindings: &B) -> Result<(), BindingError> {
        match self {
            Self::Alert(alert) => bindings.show_alert(alert),
            Self::Link(link) => bindings.open_link(link),
        }
    }
}
