//! `cmake-ship version`

use crate::core::error::ShipResult;
use crate::core::registers::CounterState;
use crate::core::resolver::VersionResolver;
use crate::core::vcs::SystemGit;
use std::path::Path;
use tracing::info;

/// Print the composite version of the project at `root`
///
/// Creates or normalises the counter file when needed, like every other
/// command that reads it.
pub fn run_version(root: &Path, json: bool) -> ShipResult<()> {
  let git = SystemGit::new(root);
  let resolver = VersionResolver::new(root, &git);

  let counter = resolver.read_counter()?;
  match counter.state {
    CounterState::Created => info!("created {} with 0", resolver.counter.path().display()),
    CounterState::Reset => info!("reset {} to 0", resolver.counter.path().display()),
    CounterState::Present => {}
  }

  let resolved = resolver.resolve()?;
  if json {
    println!("{}", serde_json::to_string_pretty(&resolved)?);
  } else {
    println!("{}", resolved.full);
  }

  Ok(())
}
