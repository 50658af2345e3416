//! The release pipeline
//!
//! A strictly linear sequence of stages with early exit:
//!
//! 1. load descriptor            7. rebuild
//! 2. parse current version      8. verify artifacts
//! 3. compute next version       9. package
//! 4. resolve git state         10. commit + push (deploy only)
//! 5. dirty-tree guard          11. tag
//! 6. persist version + counter 12. upload, with tag-only rollback
//!
//! Stage 6 is the commit point. Nothing before it writes to disk, and nothing
//! after it undoes the version bump. The only compensating action is removing
//! the tag created in stage 11 when the upload fails.

use crate::build::{Builder, verify_artifacts};
use crate::core::config::{BUILD_COUNTER_FILE, ProjectDescriptor, VERSION_SOURCE_FILE};
use crate::core::error::{ConfigError, PreconditionError, ShipError, ShipResult};
use crate::core::registers::{BuildCounter, VersionDeclaration};
use crate::core::vcs::SourceControl;
use crate::core::version::{CompositeVersion, GitState, VersionBump};
use crate::release::host::{ReleaseDraft, ReleaseHost};
use crate::release::package::{PackagePlan, PackageSummary, archive_name, write_package};
use crate::utils::platform_tag;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What the operator asked for
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineRequest {
  pub bump: VersionBump,
  /// Commit, tag and upload; otherwise stop after packaging
  pub deploy: bool,
}

/// External tools the pipeline drives
pub struct Toolchain<'a> {
  pub builder: &'a dyn Builder,
  pub scm: &'a dyn SourceControl,
  pub host: &'a dyn ReleaseHost,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
  pub project: String,
  pub previous_version: String,
  pub version: CompositeVersion,
  pub bump: VersionBump,
  pub dry_run: bool,
  pub package: PackageSummary,
  pub missing_libraries: Vec<String>,
  /// Set once the tag has been pushed
  pub tag: Option<String>,
  pub finished_at: DateTime<Utc>,
}

pub struct ReleasePipeline<'a> {
  root: PathBuf,
  descriptor_path: PathBuf,
  platform: String,
  request: PipelineRequest,
  tools: Toolchain<'a>,
}

impl<'a> ReleasePipeline<'a> {
  pub fn new(root: &Path, descriptor_path: &Path, request: PipelineRequest, tools: Toolchain<'a>) -> Self {
    Self {
      root: root.to_path_buf(),
      descriptor_path: descriptor_path.to_path_buf(),
      platform: platform_tag(),
      request,
      tools,
    }
  }

  /// Override the platform tag used in the archive name
  pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
    self.platform = platform.into();
    self
  }

  pub fn run(&self) -> ShipResult<PipelineReport> {
    let descriptor = ProjectDescriptor::load(&self.descriptor_path)?;
    info!(project = %descriptor.project_name, "loaded {}", self.descriptor_path.display());

    let declaration = VersionDeclaration::new(self.root.join(VERSION_SOURCE_FILE));
    let counter = BuildCounter::new(self.root.join(BUILD_COUNTER_FILE));
    let current = declaration.read()?.version;
    let current_build = counter.peek()?.value;

    let bump = self.request.bump;
    let next = bump.apply(&current).ok_or_else(|| {
      ShipError::Config(ConfigError::ValueOverflow {
        path: declaration.path().to_path_buf(),
        field: "version",
      })
    })?;
    let next_build = bump.next_build(current_build).ok_or_else(|| {
      ShipError::Config(ConfigError::ValueOverflow {
        path: counter.path().to_path_buf(),
        field: "build counter",
      })
    })?;

    let git = GitState::new(self.tools.scm.short_commit(), self.tools.scm.is_dirty());
    if self.request.deploy && git.dirty {
      return Err(ShipError::Precondition(PreconditionError::DirtyWorkingTree));
    }

    let version = CompositeVersion::new(next.clone(), next_build, git);
    info!(bump = %bump, "version {} -> {}", current, version);

    // Render before writing so a broken declaration leaves both files alone
    let original = declaration.source()?;
    let rendered = declaration.render(&next)?;
    declaration.store(&rendered)?;
    if let Err(e) = counter.store(next_build) {
      // The pair is written together or not at all
      if let Err(restore) = declaration.store(&original) {
        warn!(path = %declaration.path().display(), error = %restore, "failed to restore version declaration");
      }
      return Err(e);
    }
    debug!(version = %declaration.path().display(), counter = %counter.path().display(), "persisted");

    let build_dir = self.root.join(&descriptor.build_dir);
    self.tools.builder.clean(&build_dir)?;
    self
      .tools
      .builder
      .configure(&self.root, &build_dir, &descriptor.build_config, &descriptor.cmake_args)?;
    self.tools.builder.build(&build_dir, &descriptor.build_config)?;

    let artifacts = verify_artifacts(&self.root, &descriptor)?;
    info!(
      executables = artifacts.executables.len(),
      libraries = artifacts.libraries.len(),
      "artifacts verified"
    );

    let plan = PackagePlan::collect(&self.root, &descriptor, &artifacts)?;
    let archive = self
      .root
      .join(archive_name(&descriptor.project_name, &self.platform, &version.triple()));
    let package = write_package(&archive, &plan)?;

    let mut report = PipelineReport {
      project: descriptor.project_name.clone(),
      previous_version: current.to_string(),
      version: version.clone(),
      bump,
      dry_run: !self.request.deploy,
      package,
      missing_libraries: artifacts.missing_libraries,
      tag: None,
      finished_at: Utc::now(),
    };

    if !self.request.deploy {
      info!("dry run complete, skipping commit, tag and upload");
      return Ok(report);
    }

    self.publish(&descriptor, &version, &report.package)?;
    report.tag = Some(version.tag_name());
    report.finished_at = Utc::now();
    Ok(report)
  }

  /// Stages 10-12
  fn publish(&self, descriptor: &ProjectDescriptor, version: &CompositeVersion, package: &PackageSummary) -> ShipResult<()> {
    let scm = self.tools.scm;
    let remote = descriptor.remote.as_str();

    scm.commit_paths(
      &[PathBuf::from(VERSION_SOURCE_FILE), PathBuf::from(BUILD_COUNTER_FILE)],
      &format!("Release v{}", version),
    )?;
    scm.push_branch(remote, &descriptor.branch)?;

    let tag = version.tag_name();
    if let Err(e) = scm.delete_local_tag(&tag) {
      debug!(tag = %tag, error = %e, "no local tag to replace");
    }
    if let Err(e) = scm.delete_remote_tag(remote, &tag) {
      debug!(tag = %tag, error = %e, "no remote tag to replace");
    }
    scm.create_tag(&tag, &format!("Release {}", version))?;
    scm.push_tag(remote, &tag)?;

    let title = format!("{} {}", descriptor.project_name, tag);
    let notes = release_notes(descriptor, version, package);
    let draft = ReleaseDraft {
      repo: &descriptor.github_repo,
      tag: &tag,
      title: &title,
      notes: &notes,
    };

    let host = self.tools.host;
    if let Err(create_err) = host.create_release(&draft, &package.path) {
      warn!(error = %create_err, "release create failed, uploading to the existing release");
      if let Err(upload_err) = host.upload_asset(&descriptor.github_repo, &tag, &package.path) {
        self.rollback_tag(remote, &tag);
        return Err(ShipError::ReleaseUpload {
          tag,
          reason: format!("create: {}; upload: {}", create_err, upload_err),
        });
      }
    }

    info!(tag = %tag, repo = %descriptor.github_repo, "release published");
    Ok(())
  }

  /// Remove the tag from stage 11. The pushed version commit stays.
  fn rollback_tag(&self, remote: &str, tag: &str) {
    warn!(tag = %tag, "upload failed, removing tag");
    if let Err(e) = self.tools.scm.delete_local_tag(tag) {
      warn!(tag = %tag, error = %e, "failed to delete local tag");
    }
    if let Err(e) = self.tools.scm.delete_remote_tag(remote, tag) {
      warn!(tag = %tag, error = %e, "failed to delete remote tag");
    }
  }
}

fn release_notes(descriptor: &ProjectDescriptor, version: &CompositeVersion, package: &PackageSummary) -> String {
  let file_name = package
    .path
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_default();
  format!(
    "{} {}\n\nSHA-256 ({}): {}\n",
    descriptor.project_name, version, file_name, package.sha256
  )
}
