//! Tracing bootstrap for hosts and tests
//!
//! The engine logs state transitions and rejected preconditions through
//! `tracing`. Hosts that want console output can call [`init`] once at
//! startup; filtering follows the `RUST_LOG` convention:
//!
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=easel::dock=debug` - module-level filtering

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a console subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call more than once; subsequent calls are no-ops because a
/// global subscriber is already set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer().with_target(true).with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
