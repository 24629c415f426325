use tracing_subscriber::EnvFilter;

/// Filter used when neither an explicit filter nor `RUST_LOG` is given.
pub const DEFAULT_LOG_FILTER: &str = "moments=info";

/// Installs a formatting subscriber for hosts that have none.
///
/// `filter` wins over `RUST_LOG`, which wins over [`DEFAULT_LOG_FILTER`].
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
