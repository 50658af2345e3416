//! Logging setup
//!
//! Status lines go to stderr through `tracing`; stdout is reserved for command
//! output (`version`, `header`, `--json` reports).

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_tracing(json: bool, level: Level) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  if json {
    tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
      .try_init()
      .ok();
  } else {
    tracing_subscriber::registry()
      .with(env_filter)
      .with(
        fmt::layer()
          .with_target(false)
          .without_time()
          .with_writer(std::io::stderr),
      )
      .try_init()
      .ok();
  }
}
