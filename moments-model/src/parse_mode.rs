use serde::{Deserialize, Deserializer, Serialize};

/// How strictly remote configuration is parsed.
///
/// `Strict` rejects out-of-enum and out-of-range values. `Lenient` coerces
/// them to a safe default and logs a warning, so a config written for a newer
/// SDK still loads on an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    Strict,
    #[default]
    Lenient,
}

impl ParseMode {
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Reads an explicit JSON `null` as the field's default, the same as an
/// absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
