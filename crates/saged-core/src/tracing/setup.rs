//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "SAGED_LOG";

/// Initialize the SAGED tracing/logging system.
///
/// Reads `SAGED_LOG` for per-module log levels, e.g.
/// `SAGED_LOG=saged_diagnosis::significance=debug,saged_diagnosis=info`.
///
/// Falls back to `saged=info` if `SAGED_LOG` is not set or is invalid.
/// Idempotent; a subscriber installed by the host process is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("saged=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
