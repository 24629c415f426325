use serde::{Deserialize, Serialize};

/// Visual theme handed to the capability interface.
///
/// Carried through as configured; colors and fonts are checked by the
/// platform layer that renders them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_foreground_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold_font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_font_for_user_preference: Option<bool>,
}
