//! Tracing subscriber setup for hosts that do not install their own.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install a fmt subscriber filtered by `VOXCODE_LOG` (default `info`).
///
/// Safe to call repeatedly; a subscriber set elsewhere wins.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env("VOXCODE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
