//! # beacon-engine
//!
//! **Tier 4 (Orchestration)**
//!
//! Analytics Engine: resolves a report window, collects and assembles the
//! commit dataset, runs the three independent analyzers concurrently, feeds
//! their outputs into the Risk Assessor, and caches the assembled
//! [`ReportBundle`]. The orchestration shape is straightforward: resolve
//! inputs, run the pipeline, return a typed result — generalized here into
//! a cached, deadline-bounded analytics query.
//!
//! ## What belongs here
//! * Window resolution, dataset assembly, analyzer scheduling
//! * Caching, cooperative deadlines, diagnostics
//!
//! ## What does NOT belong here
//! * Analysis computation (use `beacon-analysis-*` / `beacon-risk`)
//! * Report rendering (use `beacon-format`)
//! * CLI argument parsing (use `beacon-cli`)

use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use beacon_format::BeaconError;
use beacon_settings::BeaconConfig;
use beacon_types::analysis::{ReportBundle, TimeReport, Totals};
use beacon_types::Window;
use lru::LruCache;

/// A cooperative, best-effort deadline. Each analyzer job races against the
/// remaining budget rather than being forcibly killed; a job that misses the
/// deadline keeps running on its own thread, but its result is discarded and
/// that slot is reported as `None` (§9's "contained analyzer failure").
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    hard: Instant,
}

impl Deadline {
    #[must_use]
    pub fn starting_now(budget: Duration) -> Self {
        Self {
            hard: Instant::now() + budget,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.hard.saturating_duration_since(Instant::now())
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.hard
    }
}

/// A diagnostic event emitted by the engine: soft-budget warnings, cache
/// hits/misses, analyzer cancellations, and I/O retries (§10.1). Closed, not
/// stringly-typed, so a `Diagnostics` sink can match on kind rather than
/// parse a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    CacheHit { repo_identifier: String },
    CacheMiss { repo_identifier: String },
    AnalyzerCancelled { component: &'static str },
    RepoAccessRetried { reason: String },
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::CacheHit { repo_identifier } => {
                write!(f, "cache hit for '{repo_identifier}'")
            }
            DiagnosticEvent::CacheMiss { repo_identifier } => {
                write!(f, "cache miss for '{repo_identifier}'")
            }
            DiagnosticEvent::AnalyzerCancelled { component } => {
                write!(f, "'{component}' exceeded its deadline and was cancelled")
            }
            DiagnosticEvent::RepoAccessRetried { reason } => {
                write!(f, "retrying repository access after transient failure: {reason}")
            }
        }
    }
}

/// Sink for engine diagnostics. Library consumers can redirect, suppress, or
/// count these; `beacon-cli` gates them behind `-v`/`--verbose`.
pub trait Diagnostics: Send + Sync {
    fn record(&self, event: DiagnosticEvent);
}

/// Default sink: writes every event to stderr, one line each.
#[derive(Debug, Default)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        eprintln!("beacon: {event}");
    }
}

/// Sink that discards every event, for library consumers and quiet CLI runs.
#[derive(Debug, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn record(&self, _event: DiagnosticEvent) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    repo_identifier: String,
    since: i64,
    until: i64,
    config_hash: String,
}

/// The Analytics Engine: owns the result cache and the diagnostics sink
/// across repeated queries against (usually) the same repository.
pub struct AnalyticsEngine {
    config: BeaconConfig,
    cache: Mutex<LruCache<CacheKey, ReportBundle>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl AnalyticsEngine {
    #[must_use]
    pub fn new(config: BeaconConfig) -> Self {
        Self::with_diagnostics(config, Arc::new(StderrDiagnostics))
    }

    #[must_use]
    pub fn with_diagnostics(config: BeaconConfig, diagnostics: Arc<dyn Diagnostics>) -> Self {
        let capacity = NonZeroUsize::new(config.engine.cache_size.max(1))
            .unwrap_or(NonZeroUsize::new(1).expect("1 is non-zero"));
        Self {
            config,
            cache: Mutex::new(LruCache::new(capacity)),
            diagnostics,
        }
    }

    /// Resolve a window, build the commit dataset, run the analyzer pipeline,
    /// and return the assembled report. Cached on `(repo, window, config)`
    /// unless `no_cache` is set.
    ///
    /// # Errors
    /// Returns [`BeaconError`] for an unresolvable repo path, an invalid
    /// window, a window exceeding `engine.max_commits`, or a git access
    /// failure that survives the single retry (§4.1).
    pub fn analyze_range(
        &self,
        repo_path: &Path,
        since: Option<&str>,
        until: Option<&str>,
        no_cache: bool,
        now: i64,
    ) -> Result<ReportBundle, BeaconError> {
        let repo_root = beacon_git::repo_root(repo_path)
            .ok_or_else(|| BeaconError::repo_not_found(&repo_path.display().to_string()))?;
        let repo_identifier = repo_root.display().to_string();

        let resolved = beacon_dateparse::resolve_window(since, until, now)
            .map_err(BeaconError::invalid_window)?;
        let window = Window {
            since: resolved.since,
            until: resolved.until,
        };

        let config_hash = blake3::hash(&serde_json::to_vec(&self.config)?).to_hex().to_string();
        let key = CacheKey {
            repo_identifier: repo_identifier.clone(),
            since: window.since,
            until: window.until,
            config_hash,
        };

        if !no_cache {
            let mut cache = self.cache.lock().expect("cache mutex poisoned");
            if let Some(cached) = cache.get(&key) {
                self.diagnostics.record(DiagnosticEvent::CacheHit {
                    repo_identifier: repo_identifier.clone(),
                });
                return Ok(cached.clone());
            }
            self.diagnostics.record(DiagnosticEvent::CacheMiss { repo_identifier });
        }

        let bundle = self.compute(&repo_root, window)?;

        if !no_cache {
            let mut cache = self.cache.lock().expect("cache mutex poisoned");
            cache.put(key, bundle.clone());
        }

        Ok(bundle)
    }

    fn compute(&self, repo_root: &Path, window: Window) -> Result<ReportBundle, BeaconError> {
        let max_commits = self.config.engine.max_commits;
        let raw_commits =
            collect_history_with_retry(repo_root, window.since, window.until, max_commits + 1, &self.diagnostics)?;

        if raw_commits.len() > max_commits {
            return Err(BeaconError::window_too_large(raw_commits.len(), max_commits));
        }

        let dataset = Arc::new(beacon_dataset::CommitDataset::build(window, raw_commits));

        let totals = Totals {
            commits: dataset.commits.len(),
            files_changed: dataset.total_files_changed(),
            lines_added: dataset.total_lines_added(),
            lines_deleted: dataset.total_lines_deleted(),
        };
        let mut authors = std::collections::BTreeMap::new();
        for (author, indexes) in &dataset.indexes.by_author {
            authors.insert(author.clone(), indexes.len() as u32);
        }

        let deadline = Deadline::starting_now(Duration::from_millis(self.config.engine.deadline_ms));

        let time_rx = {
            let dataset = Arc::clone(&dataset);
            let config = self.config.time.clone();
            spawn_job(move || {
                let velocity = beacon_analysis_time::velocity_trends(&dataset, &config);
                let heatmap = beacon_analysis_time::activity_heatmap(&dataset);
                let bus_factor = beacon_analysis_time::bus_factor(&dataset, &config);
                TimeReport {
                    velocity,
                    heatmap,
                    bus_factor,
                }
            })
        };
        let team_rx = {
            let dataset = Arc::clone(&dataset);
            let config = self.config.team.clone();
            spawn_job(move || beacon_analysis_team::analyze(&dataset, &config))
        };
        let quality_rx = {
            let dataset = Arc::clone(&dataset);
            let config = self.config.quality.clone();
            spawn_job(move || beacon_analysis_quality::analyze(&dataset, &config))
        };

        let time = recv_within_deadline(&time_rx, &deadline, "time", &self.diagnostics);
        let team = recv_within_deadline(&team_rx, &deadline, "team", &self.diagnostics);
        let quality = recv_within_deadline(&quality_rx, &deadline, "quality", &self.diagnostics);

        let risk = beacon_risk::assess(
            time.as_ref().map(|t| &t.bus_factor),
            team.as_ref(),
            quality.as_ref().map(|q| &q.churn),
            time.as_ref().map(|t| &t.velocity),
            &self.config.risk,
        );

        Ok(ReportBundle {
            window,
            totals,
            authors,
            time,
            team,
            quality,
            risk: Some(risk),
        })
    }
}

fn spawn_job<T, F>(f: F) -> mpsc::Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx
}

fn recv_within_deadline<T>(
    rx: &mpsc::Receiver<T>,
    deadline: &Deadline,
    component: &'static str,
    diagnostics: &Arc<dyn Diagnostics>,
) -> Option<T> {
    match rx.recv_timeout(deadline.remaining()) {
        Ok(value) => Some(value),
        Err(_) => {
            diagnostics.record(DiagnosticEvent::AnalyzerCancelled { component });
            None
        }
    }
}

/// Jitter derived from the wall clock's sub-second nanoseconds, used to
/// stagger the single retry on a transient RAL failure (§4.1). Not
/// cryptographic; just enough spread to avoid thundering-herd retries when a
/// caller fans out many repositories at once.
fn jitter() -> Duration {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    Duration::from_millis(50 + u64::from(nanos % 150))
}

fn collect_history_with_retry(
    repo_root: &Path,
    since: i64,
    until: i64,
    max_commits: usize,
    diagnostics: &Arc<dyn Diagnostics>,
) -> Result<Vec<beacon_git::RawGitCommit>, BeaconError> {
    match beacon_git::collect_history(repo_root, since, until, Some(max_commits)) {
        Ok(commits) => Ok(commits),
        Err(first_err) => {
            diagnostics.record(DiagnosticEvent::RepoAccessRetried {
                reason: first_err.to_string(),
            });
            thread::sleep(jitter());
            beacon_git::collect_history(repo_root, since, until, Some(max_commits))
                .map_err(BeaconError::repo_access_error)
        }
    }
}
