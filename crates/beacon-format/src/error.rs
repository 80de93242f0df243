//! The `BeaconError`/`ErrorCode` taxonomy (§7) and the JSON response
//! envelope consumed by `--format json`: a closed error-code enum, a
//! single struct carrying code/message/details/suggestion, and named
//! constructors rather than ad hoc `anyhow!` strings at the boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One taxonomy entry per kind enumerated in §7 (input / environment /
/// resource / internal), not a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidWindow,
    InvalidCommitRef,
    WindowTooLarge,
    RepoNotFound,
    RepoAccessError,
    DeadlineExceeded,
    OutOfMemory,
    AnalyzerPartial,
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::InvalidWindow => "invalid_window",
            ErrorCode::InvalidCommitRef => "invalid_commit_ref",
            ErrorCode::WindowTooLarge => "window_too_large",
            ErrorCode::RepoNotFound => "repo_not_found",
            ErrorCode::RepoAccessError => "repo_access_error",
            ErrorCode::DeadlineExceeded => "deadline_exceeded",
            ErrorCode::OutOfMemory => "out_of_memory",
            ErrorCode::AnalyzerPartial => "analyzer_partial",
            ErrorCode::Internal => "internal",
        };
        write!(f, "{text}")
    }
}

/// The boundary error type returned by `beacon-core`/`beacon-engine`'s
/// public entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeaconError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl BeaconError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn invalid_window(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidWindow, format!("invalid window: {reason}"))
    }

    #[must_use]
    pub fn invalid_commit_ref(reference: &str) -> Self {
        Self::new(
            ErrorCode::InvalidCommitRef,
            format!("not a valid commit reference: '{reference}'"),
        )
        .with_suggestion("pass a hex prefix of at least 7 characters")
    }

    #[must_use]
    pub fn window_too_large(count: usize, max: usize) -> Self {
        Self::new(
            ErrorCode::WindowTooLarge,
            format!("window contains {count} commits, exceeding the {max} limit"),
        )
        .with_suggestion("narrow --since/--until or raise engine.max_commits")
    }

    #[must_use]
    pub fn repo_not_found(path: &str) -> Self {
        Self::new(ErrorCode::RepoNotFound, format!("repository not found: {path}"))
    }

    #[must_use]
    pub fn repo_access_error(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::RepoAccessError, format!("repository access failed: {reason}"))
    }

    #[must_use]
    pub fn deadline_exceeded(component: &str) -> Self {
        Self::new(
            ErrorCode::DeadlineExceeded,
            format!("'{component}' exceeded its deadline and was cancelled"),
        )
    }

    #[must_use]
    pub fn out_of_memory(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::OutOfMemory, format!("out of memory: {reason}"))
    }

    #[must_use]
    pub fn analyzer_partial(component: &str) -> Self {
        Self::new(ErrorCode::AnalyzerPartial, format!("'{component}' produced a partial result"))
    }

    #[must_use]
    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::Internal, format!("internal error: {err}"))
    }
}

impl fmt::Display for BeaconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for BeaconError {}

impl From<anyhow::Error> for BeaconError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

impl From<std::io::Error> for BeaconError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<serde_json::Error> for BeaconError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

/// The stable `--format json` envelope: `{ok, data, error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BeaconError>,
}

impl<T> ResponseEnvelope<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    #[must_use]
    pub fn err(error: BeaconError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}
