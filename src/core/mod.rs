//! Core building blocks shared by every cmake-ship command
//!
//! - **config**: project descriptor (release.json) parsing and validation
//! - **error**: error taxonomy with contextual help and exit codes
//! - **registers**: the version declaration and build counter on disk
//! - **resolver**: composite version resolution
//! - **telemetry**: tracing subscriber setup
//! - **vcs**: source-control capability and the system git backend
//! - **version**: bump arithmetic and the composite version string

pub mod config;
pub mod error;
pub mod registers;
pub mod resolver;
pub mod telemetry;
pub mod vcs;
pub mod version;
