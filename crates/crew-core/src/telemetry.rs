//! Log output for the `agent-crew` binary.
//!
//! Logs go to stderr; stdout carries only banners and the crew result.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. With `json`, every line is a JSON
/// object. A second call leaves the first subscriber in place.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let (plain, structured) = if json {
        let lines = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (None, Some(lines.json()))
    } else {
        let lines = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (Some(lines), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .try_init()
        .ok();
}
