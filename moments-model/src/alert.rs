//! Alert action.
//!
//! An alert is a native dialog with a title and/or message and at least one
//! actionable button:
//! - The OK button is shown unless `showOkButton` is `false`; it may carry an
//!   action name only while shown
//! - The cancel button is opt-in and only ever dismisses
//! - Custom buttons each need a label and pick a style
//!
//! Button order and emphasis for OK/cancel follow platform convention. Use
//! custom buttons only when an exact order matters.

use crate::error::{ModelError, ModelResult};
use crate::parse_mode::{ParseMode, null_as_default};
use serde::{Deserialize, Serialize};

/// Presentation style of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStyle {
    /// A centered dialog.
    #[default]
    Dialog,
    /// A sheet / full-screen dialog.
    Large,
}

impl AlertStyle {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "dialog" => Some(Self::Dialog),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Visual treatment of a custom alert button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    #[default]
    Default,
    Destructive,
    Primary,
}

impl ButtonStyle {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "destructive" => Some(Self::Destructive),
            "primary" => Some(Self::Primary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCustomButton {
    pub label: String,
    pub action_name: Option<String>,
    pub style: ButtonStyle,
}

impl AlertCustomButton {
    pub fn validate(&self) -> ModelResult<()> {
        if self.label.is_empty() {
            return Err(ModelError::invalid("Custom alert buttons must have a label"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertAction {
    pub title: String,
    pub message: String,
    pub show_ok_button: bool,
    pub ok_button_action_name: Option<String>,
    pub show_cancel_button: bool,
    pub style: AlertStyle,
    pub custom_buttons: Vec<AlertCustomButton>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonAlertAction {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
    show_ok_button: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    ok_button_action_name: String,
    show_cancel_button: Option<bool>,
    style: Option<String>,
    custom_buttons: Option<Vec<JsonAlertCustomButton>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonAlertCustomButton {
    #[serde(default, deserialize_with = "null_as_default")]
    label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    action_name: String,
    style: Option<String>,
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

impl AlertAction {
    /// Parses and validates an alert from the `actionData` of an action.
    ///
    /// Alert rules are the same in both parse modes.
    pub fn from_value(value: serde_json::Value, _mode: ParseMode) -> ModelResult<Self> {
        let wire: JsonAlertAction = serde_json::from_value(value).map_err(|e| {
            ModelError::malformed(
                "Unable to parse the json of an action with type=alert. Check the format, variable names, and types (eg float vs int).",
                e,
            )
        })?;

        let style = match wire.style.as_deref() {
            None => AlertStyle::Dialog,
            Some(s) => AlertStyle::parse(s)
                .ok_or_else(|| ModelError::invalid("Alert style must be 'dialog' or 'large'"))?,
        };

        let custom_buttons = wire
            .custom_buttons
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, b)| custom_button_from_json(b).map_err(|issue| button_error(i, &issue)))
            .collect::<ModelResult<Vec<_>>>()?;

        let alert = Self {
            title: wire.title,
            message: wire.message,
            show_ok_button: wire.show_ok_button.unwrap_or(true),
            ok_button_action_name: non_empty(wire.ok_button_action_name),
            show_cancel_button: wire.show_cancel_button.unwrap_or(false),
            style,
            custom_buttons,
        };
        alert.validate()?;
        Ok(alert)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.title.is_empty() && self.message.is_empty() {
            return Err(ModelError::invalid(
                "Alerts must have a title and/or a message. Both can not be blank.",
            ));
        }
        if !self.show_ok_button && self.ok_button_action_name.is_some() {
            return Err(ModelError::invalid(
                "For an alert, the okay button is hidden via 'showOkButton:false' but an Ok action name is specified. Either show the okay button or remove the action.",
            ));
        }
        if !self.show_ok_button && self.custom_buttons.is_empty() {
            return Err(ModelError::invalid(
                "Alert must have an ok button and/or custom buttons.",
            ));
        }
        for (i, button) in self.custom_buttons.iter().enumerate() {
            button
                .validate()
                .map_err(|issue| button_error(i, issue.user_message()))?;
        }
        Ok(())
    }

    /// Action names this alert can trigger from its buttons.
    pub fn embedded_action_names(&self) -> Vec<&str> {
        self.ok_button_action_name
            .as_deref()
            .into_iter()
            .chain(
                self.custom_buttons
                    .iter()
                    .filter_map(|b| b.action_name.as_deref()),
            )
            .collect()
    }
}

fn custom_button_from_json(jb: JsonAlertCustomButton) -> Result<AlertCustomButton, String> {
    let style = match jb.style.as_deref() {
        None => ButtonStyle::Default,
        Some(s) => ButtonStyle::parse(s).ok_or_else(|| {
            format!(
                "Custom alert buttons must have a valid style: default, primary, or destructive. \"{s}\" is not valid."
            )
        })?,
    };
    Ok(AlertCustomButton {
        label: jb.label,
        action_name: non_empty(jb.action_name),
        style,
    })
}

fn button_error(index: usize, issue: &str) -> ModelError {
    ModelError::invalid(format!(
        "For an alert, button at index {index} had issue \"{issue}\""
    ))
}
