use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "storefront=info,tower_http=info";

/// Installs the global `fmt` subscriber. `RUST_LOG` overrides the default
/// filter. Safe to call more than once.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
