use crate::{PropertyError, PropertyKind, PropertyResult, PropertyValue};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Properties the host must register before the engine may start.
///
/// Checked in this order by [`PropertyRegistry::validate`].
pub const REQUIRED_PROPERTIES: &[(&str, PropertyKind)] = &[
    ("platform", PropertyKind::String),
    ("os_version_string", PropertyKind::String),
    ("device_manufacturer", PropertyKind::String),
    ("device_model", PropertyKind::String),
    ("locale_language_code", PropertyKind::String),
    ("locale_country_code", PropertyKind::String),
    ("locale_currency_code", PropertyKind::String),
    ("app_version_string", PropertyKind::String),
    ("user_interface_idiom", PropertyKind::String),
    ("app_id", PropertyKind::String),
];

/// Optional properties with a known kind.
pub const WELL_KNOWN_PROPERTIES: &[(&str, PropertyKind)] = &[("user_signed_in", PropertyKind::Bool)];

/// Positional names for the integer components of a dotted version.
pub const VERSION_COMPONENT_NAMES: [&str; 7] =
    ["major", "minor", "patch", "mini", "micro", "nano", "smol"];

/// Key/value store of evaluation facts.
///
/// Populated by the host during setup and read-only once the engine runs.
/// Later registrations under the same key overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct PropertyRegistry {
    values: HashMap<String, PropertyValue>,
}

impl PropertyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a property.
    ///
    /// Overwriting with a different kind is allowed; the new kind is what
    /// [`validate`](Self::validate) sees.
    pub fn register(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(previous) = self.values.get(&key) {
            if previous.kind() != value.kind() {
                warn!(
                    "Property \"{}\" re-registered as {} (was {})",
                    key,
                    value.kind(),
                    previous.kind()
                );
            }
        }
        self.values.insert(key, value);
    }

    pub fn register_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.register(key, PropertyValue::String(value.into()));
    }

    pub fn register_int(&mut self, key: impl Into<String>, value: i64) {
        self.register(key, PropertyValue::Int(value));
    }

    pub fn register_float(&mut self, key: impl Into<String>, value: f64) {
        self.register(key, PropertyValue::Float(value));
    }

    pub fn register_bool(&mut self, key: impl Into<String>, value: bool) {
        self.register(key, PropertyValue::Bool(value));
    }

    /// Registers a dotted version string under `prefix`.
    ///
    /// Always stores `{prefix}_version_string`. If every component is numeric,
    /// also stores up to seven `{prefix}_version_{component}` integers.
    ///
    /// The string is committed before the components are parsed, so an
    /// `InvalidVersion` error still leaves `{prefix}_version_string` set.
    pub fn register_version(&mut self, prefix: &str, version: &str) -> PropertyResult<()> {
        if prefix.is_empty() {
            return Err(PropertyError::MissingPrefix);
        }

        self.register(format!("{prefix}_version_string"), version);

        let components = version
            .split('.')
            .map(|c| c.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PropertyError::InvalidVersion(version.to_string()))?;

        for (name, component) in VERSION_COMPONENT_NAMES.iter().zip(components) {
            self.register(format!("{prefix}_version_{name}"), component);
        }
        debug!("Registered version property {}: {}", prefix, version);

        Ok(())
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Returns whether a property is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all registered properties in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Checks the registry against the schema tables.
    ///
    /// Returns the first violation, checking every required key before any
    /// well-known key.
    pub fn validate(&self) -> PropertyResult<()> {
        for (key, expected) in REQUIRED_PROPERTIES {
            let value = self
                .values
                .get(*key)
                .ok_or_else(|| PropertyError::MissingRequired((*key).to_string()))?;
            check_kind(key, value, *expected)?;
        }

        for (key, expected) in WELL_KNOWN_PROPERTIES {
            if let Some(value) = self.values.get(*key) {
                check_kind(key, value, *expected)?;
            }
        }

        Ok(())
    }
}

fn check_kind(key: &str, value: &PropertyValue, expected: PropertyKind) -> PropertyResult<()> {
    if value.kind() != expected {
        return Err(PropertyError::WrongKind {
            key: key.to_string(),
            expected,
        });
    }
    Ok(())
}
