use crate::error::{ModelError, ModelResult};
use crate::parse_mode::ParseMode;
use serde::{Deserialize, Serialize};

/// Opens a URL, either in the system handler or an in-app browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAction {
    pub url: String,
    #[serde(default)]
    pub use_embedded_browser: bool,
}

impl LinkAction {
    pub fn from_value(value: serde_json::Value, _mode: ParseMode) -> ModelResult<Self> {
        let link: Self = serde_json::from_value(value).map_err(|e| {
            ModelError::malformed(
                "Unable to parse the json of an action with type=link. Check the format, variable names, and types.",
                e,
            )
        })?;
        link.validate()?;
        Ok(link)
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.url.is_empty() {
            return Err(ModelError::invalid("Link actions must have a url"));
        }
        // scheme ":" rest, where scheme is ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
        let valid_scheme = self.url.split_once(':').is_some_and(|(scheme, rest)| {
            !rest.is_empty()
                && scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        });
        if !valid_scheme {
            return Err(ModelError::invalid(format!(
                "Link url must include a scheme (eg https://), got \"{}\"",
                self.url
            )));
        }
        Ok(())
    }
}
