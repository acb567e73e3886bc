//! Tracing setup for check-tsc.
//!
//! The stdout report is reserved for the captured tsc streams, so every log
//! event goes to stderr. Launcher resolution, the spawn and tsc's exit are
//! logged at `debug`; nothing below `warn` shows unless `RUST_LOG` asks for it:
//!
//! ```bash
//! RUST_LOG=tsc_runner=debug check-tsc --workspace ./web
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Installs the stderr subscriber. Call once, before the check runs.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}
