//! # beacon-core
//!
//! **Tier 5 (Library Facade)**
//!
//! This crate is the **primary library interface** for `beacon`. It
//! coordinates repository resolution, the Analytics Engine, and report
//! formatting to produce either a single-commit report or a windowed
//! range report. It is the one crate a downstream consumer should depend
//! on for that workflow.
//!
//! If you are embedding beacon into another Rust application, depend on
//! this crate and `beacon-types`/`beacon-settings`. Avoid depending on
//! `beacon-engine`/`beacon-format` directly unless you need their lower-level
//! types.
//!
//! ## What belongs here
//! * High-level workflow coordination (`analyze_range`, `inspect_commit`)
//! * Simplified API for library consumers
//! * Re-exports for convenience
//!
//! ## What does NOT belong here
//! * CLI argument parsing (use `beacon-cli`)
//! * Analyzer computation, caching (use `beacon-engine`/`beacon-analysis-*`)

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

// Re-export types for convenience so consumers need only depend on this crate.
pub use beacon_settings as settings;
pub use beacon_types as types;

pub use beacon_engine::{AnalyticsEngine, DiagnosticEvent, Diagnostics, NullDiagnostics, StderrDiagnostics};
pub use beacon_format::{BeaconError, ErrorCode, ResponseEnvelope};

use beacon_settings::BeaconConfig;
use beacon_types::analysis::ReportBundle;
use beacon_types::Commit;

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Run the complete range-report workflow: resolve the window, assemble the
/// commit dataset, run the analyzer pipeline, and return the assembled
/// [`ReportBundle`]. This is the high-level entry point for a velocity /
/// ownership / quality / risk report over a window of commit history.
///
/// # Errors
/// Returns [`BeaconError`] for an unresolvable repo path, an invalid window,
/// a window exceeding `engine.max_commits`, or a git access failure.
pub fn analyze_range(
    repo_path: &Path,
    since: Option<&str>,
    until: Option<&str>,
    no_cache: bool,
    config: BeaconConfig,
) -> Result<ReportBundle, BeaconError> {
    let engine = AnalyticsEngine::with_diagnostics(config, Arc::new(StderrDiagnostics));
    engine.analyze_range(repo_path, since, until, no_cache, now_unix())
}

/// Same as [`analyze_range`], but routes engine diagnostics through a
/// caller-supplied sink instead of stderr (used by `beacon-cli`'s
/// `-v`/`--verbose` gating).
///
/// # Errors
/// See [`analyze_range`].
pub fn analyze_range_with_diagnostics(
    repo_path: &Path,
    since: Option<&str>,
    until: Option<&str>,
    no_cache: bool,
    config: BeaconConfig,
    diagnostics: Arc<dyn Diagnostics>,
) -> Result<ReportBundle, BeaconError> {
    let engine = AnalyticsEngine::with_diagnostics(config, diagnostics);
    engine.analyze_range(repo_path, since, until, no_cache, now_unix())
}

/// Resolve and fetch a single commit by hash prefix (or any
/// `git rev-parse`-able reference) for the single-commit report.
///
/// # Errors
/// Returns [`BeaconError::invalid_commit_ref`] when the reference doesn't
/// resolve to a commit, and [`BeaconError::repo_not_found`]/
/// [`BeaconError::repo_access_error`] for repository problems.
pub fn inspect_commit(repo_path: &Path, commit_ref: &str) -> Result<Commit, BeaconError> {
    let repo_root = beacon_git::repo_root(repo_path)
        .ok_or_else(|| BeaconError::repo_not_found(&repo_path.display().to_string()))?;

    let raw = beacon_git::show_commit(&repo_root, commit_ref)
        .map_err(BeaconError::repo_access_error)?
        .ok_or_else(|| BeaconError::invalid_commit_ref(commit_ref))?;

    Ok(beacon_dataset::commit_from_raw(raw))
}
