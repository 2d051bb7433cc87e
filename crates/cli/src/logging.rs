//! Tracing initialization

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `PANTRY_LOG=pantry_core=debug`.
pub const LOG_ENV: &str = "PANTRY_LOG";

const DEFAULT_FILTER: &str = "pantry_core=error,pantry=error";

/// Install the stderr log subscriber.
///
/// Falls back to errors only if `PANTRY_LOG` is unset or invalid, so silent
/// degradations stay out of the user's way. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init();
    });
}
