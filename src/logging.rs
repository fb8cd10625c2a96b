// src/logging.rs
// tracing subscriber setup

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Installs the fmt subscriber once per component instance. An unparsable
/// directive falls back to `info`.
pub fn init(directive: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));
        // Another subscriber may already be installed by an embedding host.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
