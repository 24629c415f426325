//! The engine: lifecycle, config loading and event dispatch.

use crate::bindings::LibBindings;
use crate::error::{AppcoreError, AppcoreResult};
use moments_cache::{CacheConfig, ConfigCache, ConfigFetcher, ConfigUrl, PRIMARY_CONFIG_LABEL};
use moments_model::event::classify;
use moments_model::{DeliveryPlan, EventError, ParseMode, PrimaryConfig, Theme};
use moments_properties::{PropertyRegistry, PropertyValue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Engine lifecycle. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// Nothing set yet.
    Unconfigured,
    /// At least one setter called; `start` not yet successful.
    Configuring,
    /// Config loaded. Setters are rejected from here on.
    Running,
}

/// Tunables fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub parse_mode: ParseMode,
    pub cache: CacheConfig,
}

/// One engine instance, owned by the host.
///
/// Configure it with the setters, call [`Appcore::start`] once, then feed it
/// events. The loaded config is immutable after start, so dispatch only needs
/// `&self`.
pub struct Appcore {
    options: EngineOptions,
    state: EngineState,
    config_url: Option<ConfigUrl>,
    cache_dir: Option<PathBuf>,
    bindings: Option<Arc<dyn LibBindings>>,
    fetcher: Option<Arc<dyn ConfigFetcher>>,
    properties: PropertyRegistry,
    config: Option<PrimaryConfig>,
    plans: Vec<DeliveryPlan>,
}

impl Default for Appcore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Appcore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Appcore")
            .field("state", &self.state)
            .field("config_url", &self.config_url)
            .field("cache_dir", &self.cache_dir)
            .field("properties", &self.properties.len())
            .finish_non_exhaustive()
    }
}

impl Appcore {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            state: EngineState::Unconfigured,
            config_url: None,
            cache_dir: None,
            bindings: None,
            fetcher: None,
            properties: PropertyRegistry::new(),
            config: None,
            plans: Vec::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn begin_configuring(&mut self) -> AppcoreResult<()> {
        match self.state {
            EngineState::Running => Err(AppcoreError::AlreadyStarted),
            EngineState::Unconfigured | EngineState::Configuring => {
                self.state = EngineState::Configuring;
                Ok(())
            }
        }
    }

    // ── configuration ────────────────────────────────────────────

    /// Sets where the config is loaded from. Only `file://` and `https://`
    /// URLs are accepted.
    pub fn set_config_url(&mut self, url: &str) -> AppcoreResult<()> {
        self.begin_configuring()?;
        self.config_url = Some(ConfigUrl::parse(url)?);
        Ok(())
    }

    /// Sets the directory remote configs are cached in.
    pub fn set_cache_dir(&mut self, path: impl Into<PathBuf>) -> AppcoreResult<()> {
        self.begin_configuring()?;
        self.cache_dir = Some(path.into());
        Ok(())
    }

    pub fn register_bindings(&mut self, bindings: Arc<dyn LibBindings>) -> AppcoreResult<()> {
        self.begin_configuring()?;
        self.bindings = Some(bindings);
        Ok(())
    }

    /// Replaces the HTTPS transport used to fetch remote configs.
    pub fn set_config_fetcher(&mut self, fetcher: Arc<dyn ConfigFetcher>) -> AppcoreResult<()> {
        self.begin_configuring()?;
        self.fetcher = Some(fetcher);
        Ok(())
    }

    // ── properties ───────────────────────────────────────────────

    pub fn register_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> AppcoreResult<()> {
        self.begin_configuring()?;
        self.properties.register(key, value);
        Ok(())
    }

    pub fn register_string_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> AppcoreResult<()> {
        self.register_property(key, PropertyValue::String(value.into()))
    }

    pub fn register_int_property(&mut self, key: impl Into<String>, value: i64) -> AppcoreResult<()> {
        self.register_property(key, value)
    }

    pub fn register_float_property(&mut self, key: impl Into<String>, value: f64) -> AppcoreResult<()> {
        self.register_property(key, value)
    }

    pub fn register_bool_property(&mut self, key: impl Into<String>, value: bool) -> AppcoreResult<()> {
        self.register_property(key, value)
    }

    /// Registers `{prefix}_version_string` plus its numeric components.
    pub fn register_version_property(&mut self, prefix: &str, version: &str) -> AppcoreResult<()> {
        self.begin_configuring()?;
        self.properties.register_version(prefix, version)?;
        Ok(())
    }

    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    // ── start ────────────────────────────────────────────────────

    /// Validates the setup, loads the config and hands it to the platform.
    ///
    /// Blocks on network I/O for `https://` configs. On any error before the
    /// config is loaded the engine stays unstarted and `start` can be retried.
    /// A [`AppcoreError::PostConfigSetup`] error means the config is loaded
    /// and the engine is running, but the platform rejected part of it.
    pub fn start(&mut self) -> AppcoreResult<()> {
        if self.state == EngineState::Running {
            return Err(AppcoreError::AlreadyStarted);
        }
        let url = self.config_url.clone().ok_or(AppcoreError::MissingConfigUrl)?;
        let bindings = self.bindings.clone().ok_or(AppcoreError::MissingBindings)?;
        let cache_dir = self.cache_dir.clone().ok_or(AppcoreError::MissingCacheDir)?;
        self.properties.validate()?;

        let cache = match &self.fetcher {
            Some(fetcher) => ConfigCache::with_fetcher(cache_dir, Arc::clone(fetcher))?,
            None => ConfigCache::new(cache_dir, self.options.cache.clone())?,
        };
        let path = cache.resolve(&url, PRIMARY_CONFIG_LABEL)?;
        let bytes = std::fs::read(&path).map_err(|source| AppcoreError::ReadConfig {
            path: path.clone(),
            source,
        })?;
        let config = PrimaryConfig::parse(&bytes, self.options.parse_mode)?;

        info!("Loaded config for {} from {}", config.app_id(), url);
        self.config = Some(config);
        self.state = EngineState::Running;

        self.post_config_setup(bindings.as_ref())
    }

    fn post_config_setup(&mut self, bindings: &dyn LibBindings) -> AppcoreResult<()> {
        let config = self.config.as_ref().ok_or(AppcoreError::NotStarted)?;

        if let Some(theme) = config.default_theme() {
            bindings.set_default_theme(theme).map_err(|e| {
                AppcoreError::PostConfigSetup(format!("setting default theme: {e}"))
            })?;
        }

        let plans = config
            .delivery_plans()
            .map_err(|e| AppcoreError::PostConfigSetup(format!("building notification plans: {e}")))?;
        debug!("Handing {} notification plans to the platform", plans.len());
        let result = bindings.update_notification_plans(&plans);
        self.plans = plans;
        result.map_err(|e| {
            AppcoreError::PostConfigSetup(format!("updating notification plans: {e}"))
        })
    }

    // ── running ──────────────────────────────────────────────────

    fn running(&self) -> AppcoreResult<(&PrimaryConfig, &dyn LibBindings)> {
        let config = self.config.as_ref().ok_or(AppcoreError::NotStarted)?;
        let bindings = self.bindings.as_deref().ok_or(AppcoreError::NotStarted)?;
        Ok((config, bindings))
    }

    /// Performs every action bound to `name`, in trigger-name order.
    ///
    /// One action failing does not stop the rest; failures are logged. Only an
    /// empty name is rejected; a name the taxonomy cannot place is still
    /// dispatched.
    /// Returns how many actions succeeded.
    pub fn send_event(&self, name: &str) -> AppcoreResult<usize> {
        let (config, bindings) = self.running()?;
        match classify(name) {
            Ok(kind) => debug!("Event {} classified as {:?}", name, kind),
            Err(EventError::EmptyName) => return Err(EventError::EmptyName.into()),
            Err(e) => warn!("Dispatching unclassified event {}: {}", name, e),
        }
        let actions = config.actions_for_event(name);
        debug!("Event {} triggers {} actions", name, actions.len());

        let mut performed = 0;
        for action in actions {
            match action.perform(bindings) {
                Ok(()) => performed += 1,
                Err(e) => warn!("Action for event {} failed: {}", name, e),
            }
        }
        Ok(performed)
    }

    /// Performs a single named action and returns its failure, if any.
    pub fn perform_named_action(&self, name: &str) -> AppcoreResult<()> {
        let (config, bindings) = self.running()?;
        let action = config
            .action_with_name(name)
            .ok_or_else(|| AppcoreError::ActionNotFound(name.to_string()))?;
        action.perform(bindings)?;
        Ok(())
    }

    pub fn theme_for_name(&self, name: &str) -> Option<&Theme> {
        self.config.as_ref()?.theme_with_name(name)
    }

    /// Plans computed for the platform during the last start.
    pub fn notification_plans(&self) -> &[DeliveryPlan] {
        &self.plans
    }

    /// The loaded config, once started.
    pub fn config(&self) -> Option<&PrimaryConfig> {
        self.config.as_ref()
    }
}
