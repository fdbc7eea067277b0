//! Tracing setup for the `plancraft` binary.
//!
//! Logs go to stderr so command output on stdout stays scriptable.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILTER_ENV: &str = "PLANCRAFT_LOG";
pub const LOG_JSON_ENV: &str = "PLANCRAFT_LOG_JSON";

fn env_bool(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Filter used when `PLANCRAFT_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "plancraft=debug"
    } else {
        "warn"
    }
}

pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if env_bool(LOG_JSON_ENV) {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    // A subscriber may already be installed (tests); keep it.
    let _ = result;
}
