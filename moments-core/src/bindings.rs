use moments_model::{ActionBindings, BindingError, DeliveryPlan, Theme};

/// Everything the engine needs from the host platform.
///
/// Implementations perform the visible effect and return. They must not call
/// back into the engine.
pub trait LibBindings: ActionBindings {
    fn set_default_theme(&self, theme: &Theme) -> Result<(), BindingError>;

    /// Receives the delivery plan of every configured notification, once per
    /// start. Platforms without local notifications can ignore it.
    fn update_notification_plans(&self, plans: &[DeliveryPlan]) -> Result<(), BindingError> {
        let _ = plans;
        Ok(())
    }
}
