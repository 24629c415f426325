//! Moments engine.
//!
//! [`Appcore`] ties the pieces together: it collects properties and platform
//! bindings, loads and validates the remote config through the cache, then
//! dispatches events to the actions the config binds them to.
//!
//! ```no_run
//! use moments_core::{Appcore, LibBindings};
//! # use std::sync::Arc;
//! # fn bindings() -> Arc<dyn LibBindings> { unimplemented!() }
//! let mut core = Appcore::new();
//! core.set_config_url("https://config.example.com/app.json")?;
//! core.set_cache_dir("/var/cache/moments")?;
//! core.register_bindings(bindings())?;
//! core.register_string_property("platform", "linux")?;
//! core.start()?;
//! core.send_event("app_start")?;
//! # Ok::<(), moments_core::AppcoreError>(())
//! ```

mod appcore;
mod bindings;
mod error;
pub mod logging;

pub use appcore::{Appcore, EngineOptions, EngineState};
pub use bindings::LibBindings;
pub use error::{AppcoreError, AppcoreResult};

pub use moments_cache::{CacheConfig, ConfigFetcher, FetchOutcome};
pub use moments_model::{
    ActionBindings, AlertAction, BindingError, DeliveryPlan, LinkAction, ParseMode, PrimaryConfig,
    Theme,
};
pub use moments_properties::{PropertyRegistry, PropertyValue};
