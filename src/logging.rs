use crate::config::LOG_ENV_VAR;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global fmt subscriber.
///
/// `HOTEL_DESK_LOG` wins over `level`; an unusable directive falls back to
/// `info`. Calling this twice leaves the first subscriber in place.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}
