//! CLI commands for cmake-ship
//!
//! - **version**: print the composite version string
//! - **header**: regenerate the C version header from its template
//! - **release**: bump, rebuild, package and optionally publish
//! - **init**: bootstrap a CMake project for cmake-ship
//!
//! Every command takes the project root explicitly.

pub mod header;
pub mod init;
pub mod release;
pub mod version;

pub use header::run_header;
pub use init::run_init;
pub use release::run_release;
pub use version::run_version;
