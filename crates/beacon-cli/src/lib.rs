//! # beacon-cli
//!
//! **CLI Binary (out-of-scope-per-feature external collaborator, §6)**
//!
//! Argument parsing, `BEACON_*` environment binding, exit codes, and
//! dispatch into `beacon-core`. A Clap derive struct, a thin `fn main`,
//! `eprintln!("Error: {err:#}")`, and `process::exit` drive beacon's
//! commit-vs-range dispatch.
//!
//! ## Responsibilities
//! * Parse command line arguments, bind `BEACON_*` environment variables
//! * Dispatch to `beacon-core`'s single-commit or range-report workflow
//! * Render the result (or error) as text or the `ResponseEnvelope` JSON
//!   shape, and pick the matching process exit code
//!
//! This crate should contain minimal business logic: `beacon-core` answers
//! every "what does this do" question; this crate only answers "how is it
//! invoked".

use std::path::PathBuf;
use std::sync::Arc;

use beacon_core::{DiagnosticEvent, Diagnostics};
use beacon_format::{BeaconError, ErrorCode, ResponseEnvelope};
use beacon_settings::BeaconConfig;
use clap::{Parser, ValueEnum};

/// Exit code for a clean run.
pub const EXIT_OK: i32 = 0;
/// Generic/internal failure.
pub const EXIT_GENERIC_ERROR: i32 = 1;
/// Malformed CLI input (bad commit-ref shape, unparseable --since/--until).
pub const EXIT_INVALID_ARGS: i32 = 2;
/// `--repo` does not resolve to a git repository.
pub const EXIT_REPO_NOT_FOUND: i32 = 3;
/// The given commit reference does not resolve to a commit.
pub const EXIT_COMMIT_NOT_FOUND: i32 = 4;

/// beacon — git commit history analytics: velocity, ownership, quality, and risk.
///
/// With a commit argument, prints a single-commit report. Without one (or
/// with `--range`), prints a windowed range report over `--since`/`--until`.
#[derive(Parser, Debug)]
#[command(name = "beacon", version, about, long_about = None)]
pub struct Cli {
    /// Commit reference to inspect (hex prefix, at least 7 characters).
    #[arg(value_name = "COMMIT")]
    pub commit: Option<String>,

    /// Path to the repository to analyze.
    #[arg(long, env = "BEACON_REPO_PATH", default_value = ".")]
    pub repo: PathBuf,

    /// Output format.
    #[arg(long, value_enum, env = "BEACON_FORMAT", default_value_t = ReportFormat::Standard)]
    pub format: ReportFormat,

    /// Start of the report window (e.g. "7d", "2024-01-01", "now").
    #[arg(long, value_name = "SPEC")]
    pub since: Option<String>,

    /// End of the report window (e.g. "now", "2024-06-01").
    #[arg(long, value_name = "SPEC")]
    pub until: Option<String>,

    /// Request a range report even without a commit argument.
    #[arg(long)]
    pub range: bool,

    /// Render section headers without emoji.
    #[arg(long)]
    pub no_emoji: bool,

    /// Bypass the Analytics Engine's result cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Verbose diagnostics (repeat for more detail): budget warnings, cache
    /// hits/misses, analyzer cancellations.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// `--format` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum ReportFormat {
    Standard,
    Extended,
    Json,
}

/// Gates `eprintln!` progress notes behind `-v`/`--verbose`'s repeat count,
/// the way the lineage's own verbosity flag does, without pulling in a
/// logging framework.
#[derive(Debug, Clone, Copy)]
pub struct Verbosity(u8);

impl Verbosity {
    #[must_use]
    pub fn from_count(count: u8) -> Self {
        Self(count)
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        self.0 > 0
    }
}

struct VerboseDiagnostics {
    verbosity: Verbosity,
}

impl Diagnostics for VerboseDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        if self.verbosity.is_enabled() {
            eprintln!("beacon: {event}");
        }
    }
}

/// Run the CLI against already-parsed arguments and return the process exit
/// code. Prints the report to stdout on success, the error to stderr (or
/// both, wrapped in `ResponseEnvelope`, to stdout for `--format json`).
#[must_use]
pub fn run(cli: &Cli) -> i32 {
    let no_cache = cli.no_cache || env_flag("BEACON_NO_CACHE");

    let mut config = BeaconConfig::default();
    if cli.no_emoji {
        config.render.use_emoji = false;
    }

    let outcome = match &cli.commit {
        Some(commit_ref) if !cli.range => dispatch_commit(cli, &config, commit_ref),
        _ => dispatch_range(cli, config, no_cache),
    };

    match outcome {
        Ok(text) => {
            println!("{text}");
            EXIT_OK
        }
        Err((text, code)) => {
            eprintln!("{text}");
            code
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "yes"))
        .unwrap_or(false)
}

/// A valid commit reference per §6: a hex prefix of at least 7 characters.
/// Anything else is an invalid-argument failure (exit 2), distinct from a
/// well-formed reference that simply doesn't resolve (exit 4).
fn validate_commit_ref(commit_ref: &str) -> Result<(), String> {
    if commit_ref.len() >= 7 && commit_ref.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(format!(
            "not a valid commit reference: '{commit_ref}' (expected a hex prefix of at least 7 characters)"
        ))
    }
}

fn dispatch_commit(cli: &Cli, _config: &BeaconConfig, commit_ref: &str) -> Result<String, (String, i32)> {
    if let Err(message) = validate_commit_ref(commit_ref) {
        return Err((render_error_text(cli.format, &invalid_args_error(&message)), EXIT_INVALID_ARGS));
    }

    match beacon_core::inspect_commit(&cli.repo, commit_ref) {
        Ok(commit) => Ok(match cli.format {
            ReportFormat::Json => {
                let json = beacon_format::commit_to_json(&commit);
                serde_json::to_string_pretty(&ResponseEnvelope::ok(json)).expect("CommitJson always serializes")
            }
            ReportFormat::Extended => beacon_format::format_commit_report(&commit, true),
            ReportFormat::Standard => beacon_format::format_commit_report(&commit, false),
        }),
        Err(err) => {
            let code = exit_code_for(&err);
            Err((render_error_text(cli.format, &err), code))
        }
    }
}

fn dispatch_range(cli: &Cli, config: BeaconConfig, no_cache: bool) -> Result<String, (String, i32)> {
    let verbosity = Verbosity::from_count(cli.verbose);
    let diagnostics: Arc<dyn Diagnostics> = Arc::new(VerboseDiagnostics { verbosity });
    let format = cli.format;
    let render_config = config.clone();

    let result = beacon_core::analyze_range_with_diagnostics(
        &cli.repo,
        cli.since.as_deref(),
        cli.until.as_deref(),
        no_cache,
        config,
        diagnostics,
    );

    match result {
        Ok(bundle) => Ok(match format {
            ReportFormat::Json => {
                serde_json::to_string_pretty(&ResponseEnvelope::ok(bundle)).expect("ReportBundle always serializes")
            }
            ReportFormat::Standard | ReportFormat::Extended => {
                beacon_format::format_range_report(&bundle, &render_config)
            }
        }),
        Err(err) => {
            let code = exit_code_for(&err);
            Err((render_error_text(format, &err), code))
        }
    }
}

fn invalid_args_error(message: &str) -> BeaconError {
    BeaconError::new(ErrorCode::InvalidCommitRef, message.to_string())
}

fn render_error_text(format: ReportFormat, err: &BeaconError) -> String {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(&ResponseEnvelope::<()>::err(err.clone()))
            .unwrap_or_else(|_| format!("{{\"ok\":false,\"error\":{{\"message\":\"{err}\"}}}}")),
        _ => format!("Error: {err}"),
    }
}

fn exit_code_for(err: &BeaconError) -> i32 {
    match err.code {
        ErrorCode::RepoNotFound => EXIT_REPO_NOT_FOUND,
        ErrorCode::InvalidCommitRef => EXIT_COMMIT_NOT_FOUND,
        ErrorCode::InvalidWindow | ErrorCode::WindowTooLarge => EXIT_INVALID_ARGS,
        ErrorCode::RepoAccessError
        | ErrorCode::DeadlineExceeded
        | ErrorCode::OutOfMemory
        | ErrorCode::AnalyzerPartial
        | ErrorCode::Internal => EXIT_GENERIC_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_commit_ref_accepts_seven_hex_chars() {
        assert!(validate_commit_ref("abc1234").is_ok());
    }

    #[test]
    fn validate_commit_ref_rejects_short_or_non_hex() {
        assert!(validate_commit_ref("abc12").is_err());
        assert!(validate_commit_ref("zzzzzzz").is_err());
    }

    #[test]
    fn exit_code_maps_repo_not_found_to_three() {
        let err = BeaconError::repo_not_found("/tmp/missing");
        assert_eq!(exit_code_for(&err), EXIT_REPO_NOT_FOUND);
    }

    #[test]
    fn exit_code_maps_invalid_commit_ref_to_four() {
        let err = BeaconError::invalid_commit_ref("zz");
        assert_eq!(exit_code_for(&err), EXIT_COMMIT_NOT_FOUND);
    }

    #[test]
    fn exit_code_maps_window_too_large_to_two() {
        let err = BeaconError::window_too_large(100, 50);
        assert_eq!(exit_code_for(&err), EXIT_INVALID_ARGS);
    }

    #[test]
    fn json_error_rendering_wraps_in_response_envelope() {
        let err = BeaconError::repo_not_found("/tmp/missing");
        let text = render_error_text(ReportFormat::Json, &err);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], "repo_not_found");
    }

    #[test]
    fn text_error_rendering_is_a_single_line() {
        let err = BeaconError::repo_not_found("/tmp/missing");
        let text = render_error_text(ReportFormat::Standard, &err);
        assert!(text.starts_with("Error: "));
        assert_eq!(text.lines().count(), 1);
    }
}
