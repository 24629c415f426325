//! Typed property registry for the Moments decision core.
//!
//! The host application registers facts about the device, the app and the
//! signed-in user once during setup. Conditions are later evaluated against
//! these facts, so the registry enforces a small schema:
//! - **Required** keys must exist with the exact kind before the engine starts
//! - **Well-known** keys are optional but kind-checked when present
//! - Any other key is accepted as-is (forward compatibility)
//!
//! Values are a closed set of scalar kinds ([`PropertyValue`]), so a kind
//! check is a tag comparison.

mod error;
mod registry;
mod value;

pub use error::{PropertyError, PropertyResult};
pub use registry::{
    PropertyRegistry, REQUIRED_PROPERTIES, VERSION_COMPONENT_NAMES, WELL_KNOWN_PROPERTIES,
};
pub use value::{PropertyKind, PropertyValue};
