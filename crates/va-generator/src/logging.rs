//! Logging configuration using tracing.
//!
//! Logs go to stderr so stdout stays free for generated code. The level is
//! controlled by the `VA_LOG` environment variable.
//!
//! ```bash
//! VA_LOG=debug va-generate --example 1
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "VA_LOG";

/// Install the global subscriber.
///
/// `quiet` lowers the default to warnings; `VA_LOG` always wins. Calling this
/// twice is harmless.
pub fn init(quiet: bool) {
    let default = if quiet {
        "warn"
    } else {
        "va_generator=info,va_core=info,warn"
    };
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
