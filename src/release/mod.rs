//! Release orchestration
//!
//! A release run bumps the persisted version, rebuilds the project from
//! scratch, verifies and packages the artifacts and, on a real deploy,
//! commits, tags and publishes the archive to the release host.
//!
//! # Rollback
//!
//! The only compensating action is deleting the release tag when the upload
//! fails. The version bump and its pushed commit are never reverted; a re-run
//! re-derives everything from the files and git state on disk.

pub mod host;
pub mod package;
pub mod pipeline;

pub use host::GhCli;
pub use pipeline::{PipelineReport, PipelineRequest, ReleasePipeline, Toolchain};
