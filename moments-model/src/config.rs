//! The root configuration document.
//!
//! A [`PrimaryConfig`] is only ever handed out fully validated: every action,
//! notification and theme parsed, and every cross reference between them
//! resolved.

use crate::action::Action;
use crate::error::{ModelError, ModelResult};
use crate::notification::Notification;
use crate::parse_mode::{ParseMode, null_as_default};
use crate::resolver::DeliveryPlan;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// The only config schema version this SDK reads.
pub const CONFIG_VERSION_V1: &str = "v1";

/// Binds an event to a named action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub name: String,
    pub event_name: String,
    pub action_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonPrimaryConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    config_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    app_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    themes: JsonThemesSection,
    #[serde(default, deserialize_with = "null_as_default")]
    actions: JsonActionsSection,
    #[serde(default, deserialize_with = "null_as_default")]
    triggers: JsonTriggersSection,
    #[serde(default, deserialize_with = "null_as_default")]
    notifications: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonThemesSection {
    default_theme_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    named_themes: BTreeMap<String, Theme>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonActionsSection {
    #[serde(default, deserialize_with = "null_as_default")]
    named_actions: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonTriggersSection {
    #[serde(default, deserialize_with = "null_as_default")]
    named_triggers: BTreeMap<String, JsonTrigger>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonTrigger {
    #[serde(default, deserialize_with = "null_as_default")]
    event_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    action_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryConfig {
    app_id: String,
    default_theme_name: Option<String>,
    themes: BTreeMap<String, Theme>,
    actions: BTreeMap<String, Action>,
    /// Actions dropped by lenient parsing because their type is unknown.
    skipped_actions: BTreeSet<String>,
    triggers: Vec<Trigger>,
    /// Event name to action names, in trigger-name order.
    actions_by_event: HashMap<String, Vec<String>>,
    notifications: BTreeMap<String, Notification>,
}

impl PrimaryConfig {
    pub fn from_json_str(json: &str, mode: ParseMode) -> ModelResult<Self> {
        Self::parse(json.as_bytes(), mode)
    }

    pub fn parse(bytes: &[u8], mode: ParseMode) -> ModelResult<Self> {
        let wire: JsonPrimaryConfig = serde_json::from_slice(bytes).map_err(|e| {
            ModelError::malformed(
                "Unable to parse the config file. Check the format, variable names, and types (eg float vs int).",
                e,
            )
        })?;

        if wire.config_version != CONFIG_VERSION_V1 {
            return Err(ModelError::invalid(format!(
                "Unsupported config version \"{}\". Expected \"{CONFIG_VERSION_V1}\".",
                wire.config_version
            )));
        }

        let mut actions = BTreeMap::new();
        let mut skipped_actions = BTreeSet::new();
        for (name, value) in wire.actions.named_actions {
            if name.is_empty() {
                return Err(ModelError::invalid("Actions must have a non-empty name"));
            }
            match Action::from_value(value, mode)
                .map_err(|e| e.context(format!("Issue with action \"{name}\"")))?
            {
                Some(action) => {
                    actions.insert(name, action);
                }
                None => {
                    skipped_actions.insert(name);
                }
            }
        }

        let mut notifications = BTreeMap::new();
        for (id, value) in wire.notifications {
            let mut notification = Notification::from_value(value, mode)
                .map_err(|e| e.context(format!("Issue with notification \"{id}\"")))?;
            notification.id = id.clone();
            notification
                .validate()
                .map_err(|e| e.context(format!("Issue with notification \"{id}\"")))?;
            notifications.insert(id, notification);
        }

        let mut triggers = Vec::new();
        for (name, trigger) in wire.triggers.named_triggers {
            if trigger.event_name.is_empty() {
                return Err(ModelError::invalid(format!(
                    "Trigger \"{name}\" must have an eventName"
                )));
            }
            triggers.push(Trigger {
                name,
                event_name: trigger.event_name,
                action_name: trigger.action_name,
            });
        }

        let config = Self {
            app_id: wire.app_id,
            default_theme_name: wire.themes.default_theme_name.filter(|n| !n.is_empty()),
            themes: wire.themes.named_themes,
            actions,
            skipped_actions,
            actions_by_event: HashMap::new(),
            triggers,
            notifications,
        };
        config.validate_references()?;
        Ok(config.index_triggers())
    }

    fn validate_references(&self) -> ModelResult<()> {
        if let Some(default_theme) = &self.default_theme_name {
            if !self.themes.contains_key(default_theme) {
                return Err(ModelError::invalid(format!(
                    "Default theme \"{default_theme}\" is not defined in namedThemes"
                )));
            }
        }

        for (name, action) in &self.actions {
            for embedded in action.embedded_action_names() {
                self.check_action_reference(embedded)
                    .map_err(|e| e.context(format!("Issue with action \"{name}\"")))?;
            }
            for theme in action.embedded_theme_names() {
                if !self.themes.contains_key(theme) {
                    return Err(ModelError::invalid(format!(
                        "Issue with action \"{name}\": theme \"{theme}\" is not defined"
                    )));
                }
            }
        }

        for (id, notification) in &self.notifications {
            for embedded in notification.embedded_action_names() {
                self.check_action_reference(embedded)
                    .map_err(|e| e.context(format!("Issue with notification \"{id}\"")))?;
            }
        }

        for trigger in &self.triggers {
            self.check_action_reference(&trigger.action_name)
                .map_err(|e| e.context(format!("Issue with trigger \"{}\"", trigger.name)))?;
        }
        Ok(())
    }

    fn check_action_reference(&self, name: &str) -> ModelResult<()> {
        if self.actions.contains_key(name) || self.skipped_actions.contains(name) {
            return Ok(());
        }
        Err(ModelError::invalid(format!(
            "No action found with name: {name}"
        )))
    }

    fn index_triggers(mut self) -> Self {
        let mut actions_by_event: HashMap<String, Vec<String>> = HashMap::new();
        for trigger in &self.triggers {
            if self.skipped_actions.contains(&trigger.action_name) {
                warn!(
                    "Trigger \"{}\" targets unsupported action \"{}\" and will not fire",
                    trigger.name, trigger.action_name
                );
                continue;
            }
            actions_by_event
                .entry(trigger.event_name.clone())
                .or_default()
                .push(trigger.action_name.clone());
        }
        debug!(
            "Loaded config for {} with {} actions, {} triggers, {} notifications",
            self.app_id,
            self.actions.len(),
            self.triggers.len(),
            self.notifications.len()
        );
        self.actions_by_event = actions_by_event;
        self
    }

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Actions bound to `event_name`, ordered by trigger name.
    pub fn actions_for_event(&self, event_name: &str) -> Vec<&Action> {
        self.actions_by_event
            .get(event_name)
            .map(|names| names.iter().filter_map(|n| self.actions.get(n)).collect())
            .unwrap_or_default()
    }

    pub fn action_with_name(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Names of actions that were skipped because their type is not supported
    /// by this SDK version.
    pub fn skipped_action_names(&self) -> impl Iterator<Item = &str> {
        self.skipped_actions.iter().map(String::as_str)
    }

    pub fn theme_with_name(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    pub fn default_theme_name(&self) -> Option<&str> {
        self.default_theme_name.as_deref()
    }

    pub fn default_theme(&self) -> Option<&Theme> {
        self.default_theme_name
            .as_deref()
            .and_then(|name| self.themes.get(name))
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Notifications ordered by ID.
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.values()
    }

    pub fn notification_with_id(&self, id: &str) -> Option<&Notification> {
        self.notifications.get(id)
    }

    /// Delivery plans for every notification, ordered by ID.
    pub fn delivery_plans(&self) -> ModelResult<Vec<DeliveryPlan>> {
        self.notifications
            .values()
            .map(DeliveryPlan::for_notification)
            .collect()
    }
}
