use moments_properties::{
    PropertyError, PropertyKind, PropertyRegistry, PropertyValue, REQUIRED_PROPERTIES,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn populated_registry() -> PropertyRegistry {
    let mut registry = PropertyRegistry::new();
    registry.register_string("platform", "iOS");
    registry.register_string("os_version_string", "17.2");
    registry.register_string("device_manufacturer", "Apple");
    registry.register_string("device_model", "iPhone15,2");
    registry.register_string("locale_language_code", "en");
    registry.register_string("locale_country_code", "CA");
    registry.register_string("locale_currency_code", "CAD");
    registry.register_string("app_version_string", "1.4.0");
    registry.register_string("user_interface_idiom", "phone");
    registry.register_string("app_id", "com.example.app");
    registry
}

// ── register / value ─────────────────────────────────────────────

#[test]
fn value_absent_for_unknown_key() {
    let registry = PropertyRegistry::new();
    assert!(registry.value("nope").is_none());
    assert!(registry.is_empty());
}

#[test]
fn register_overwrites() {
    let mut registry = PropertyRegistry::new();
    registry.register("screen_width", 320);
    registry.register("screen_width", 390);
    assert_eq!(registry.value("screen_width"), Some(&PropertyValue::Int(390)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn register_different_kind_changes_reported_kind() {
    let mut registry = PropertyRegistry::new();
    registry.register("battery_level", 0.5);
    registry.register("battery_level", "full");
    assert_eq!(
        registry.value("battery_level").map(PropertyValue::kind),
        Some(PropertyKind::String)
    );
}

#[test]
fn typed_wrappers_store_matching_kinds() {
    let mut registry = PropertyRegistry::new();
    registry.register_int("launch_count", 4);
    registry.register_float("screen_scale", 3.0);
    registry.register_bool("user_signed_in", true);
    assert_eq!(registry.value("launch_count").and_then(PropertyValue::as_int), Some(4));
    assert_eq!(registry.value("screen_scale").and_then(PropertyValue::as_float), Some(3.0));
    assert_eq!(registry.value("user_signed_in").and_then(PropertyValue::as_bool), Some(true));
}

// ── register_version ─────────────────────────────────────────────

#[test]
fn version_decomposes_into_components() {
    let mut registry = PropertyRegistry::new();
    registry.register_version("app", "2.10.3").unwrap();

    assert_eq!(
        registry.value("app_version_string"),
        Some(&PropertyValue::String("2.10.3".into()))
    );
    assert_eq!(registry.value("app_version_major"), Some(&PropertyValue::Int(2)));
    assert_eq!(registry.value("app_version_minor"), Some(&PropertyValue::Int(10)));
    assert_eq!(registry.value("app_version_patch"), Some(&PropertyValue::Int(3)));
    assert!(registry.value("app_version_mini").is_none());
}

#[test]
fn invalid_version_still_stores_string() {
    let mut registry = PropertyRegistry::new();
    let err = registry.register_version("app", "2.x.3").unwrap_err();

    assert_eq!(err, PropertyError::InvalidVersion("2.x.3".into()));
    assert_eq!(
        registry.value("app_version_string"),
        Some(&PropertyValue::String("2.x.3".into()))
    );
    assert!(registry.value("app_version_major").is_none());
}

#[test]
fn version_requires_prefix() {
    let mut registry = PropertyRegistry::new();
    assert_eq!(
        registry.register_version("", "1.0"),
        Err(PropertyError::MissingPrefix)
    );
    assert!(registry.is_empty());
}

#[test]
fn version_components_capped_at_seven() {
    let mut registry = PropertyRegistry::new();
    registry.register_version("os", "1.2.3.4.5.6.7.8").unwrap();
    assert_eq!(registry.value("os_version_smol"), Some(&PropertyValue::Int(7)));
    // string + 7 components
    assert_eq!(registry.len(), 8);
}

#[test]
fn empty_version_component_is_invalid() {
    let mut registry = PropertyRegistry::new();
    assert!(registry.register_version("app", "1..2").is_err());
}

proptest! {
    #[test]
    fn numeric_versions_always_register(parts in proptest::collection::vec(0u32..10_000, 1..7)) {
        let version = parts.iter().map(u32::to_string).collect::<Vec<_>>().join(".");
        let mut registry = PropertyRegistry::new();
        prop_assert!(registry.register_version("lib", &version).is_ok());
        prop_assert_eq!(registry.value("lib_version_major"), Some(&PropertyValue::Int(i64::from(parts[0]))));
        prop_assert_eq!(registry.len(), parts.len() + 1);
    }
}

// ── validate ─────────────────────────────────────────────────────

#[test]
fn all_required_present_is_valid() {
    assert_eq!(populated_registry().validate(), Ok(()));
}

#[test]
fn each_missing_required_key_is_named() {
    for (key, _) in REQUIRED_PROPERTIES {
        let mut registry = PropertyRegistry::new();
        for (other, _) in REQUIRED_PROPERTIES.iter().filter(|(k, _)| k != key) {
            registry.register_string(*other, "x");
        }
        let err = registry.validate().unwrap_err();
        assert_eq!(err, PropertyError::MissingRequired((*key).to_string()));
        assert!(err.to_string().contains(key));
    }
}

#[test]
fn required_with_wrong_kind_fails() {
    let mut registry = populated_registry();
    registry.register_int("platform", 1);
    assert_eq!(
        registry.validate(),
        Err(PropertyError::WrongKind {
            key: "platform".into(),
            expected: PropertyKind::String,
        })
    );
}

#[test]
fn well_known_with_wrong_kind_fails() {
    let mut registry = populated_registry();
    registry.register_string("user_signed_in", "true");
    let err = registry.validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Property \"user_signed_in\" of wrong kind. Expected bool"
    );
}

#[test]
fn well_known_with_right_kind_passes() {
    let mut registry = populated_registry();
    registry.register_bool("user_signed_in", false);
    assert!(registry.validate().is_ok());
}

#[test]
fn unknown_keys_are_not_kind_checked() {
    let mut registry = populated_registry();
    registry.register("future_sdk_feature", 1.5);
    registry.register("another_one", "text");
    assert!(registry.validate().is_ok());
}

#[test]
fn missing_required_reported_before_well_known_mismatch() {
    let mut registry = PropertyRegistry::new();
    registry.register_string("user_signed_in", "nope");
    assert_eq!(
        registry.validate(),
        Err(PropertyError::MissingRequired("platform".into()))
    );
}

// ── PropertyValue ────────────────────────────────────────────────

#[test]
fn property_value_json_is_untagged() {
    let json = serde_json::to_string(&PropertyValue::from("iOS")).unwrap();
    assert_eq!(json, r#""iOS""#);
    let parsed: PropertyValue = serde_json::from_str("true").unwrap();
    assert_eq!(parsed, PropertyValue::Bool(true));
    let parsed: PropertyValue = serde_json::from_str("2.5").unwrap();
    assert_eq!(parsed.kind(), PropertyKind::Float);
    let parsed: PropertyValue = serde_json::from_str("7").unwrap();
    assert_eq!(parsed.kind(), PropertyKind::Int);
}
