//! Diagnostic logging
//!
//! The library only emits `tracing` events. Applications that have no
//! subscriber of their own can call [`init`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a fmt subscriber filtered by `RUST_LOG`
///
/// Without `RUST_LOG` the filter is `info`, or `music_catalog=debug` when
/// `debug` is set. Does nothing if a global subscriber already exists.
pub fn init(debug: bool) {
    let fallback = if debug { "music_catalog=debug" } else { "info" };

    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Emits a request-chain event at `info` when the session debug flag is on,
/// otherwise at `debug`
macro_rules! verbose {
    ($debug:expr, $($arg:tt)+) => {
        if $debug {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

pub(crate) use verbose;
