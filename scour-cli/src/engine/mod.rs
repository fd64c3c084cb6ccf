//! Retention engine
//!
//! Runs a sweep in phases: build the tag protection set, scan workflow runs
//! up to the horizon, then fan out one task per surviving run to classify and
//! delete its artifacts. The first two phases are sequential and any failure
//! there aborts the sweep with nothing deleted; failures in the fan-out are
//! collected per artifact and surfaced once everything has settled.

mod deleter;
mod filter;
mod pages;
mod protection;
mod scanner;

pub use deleter::{ArtifactDeleter, DryRunDeleter, GithubDeleter};

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::api::ActionsApi;
use scour_core::domain::RetentionPolicy;

/// Counts from a single retention sweep.
#[derive(Debug, Default)]
pub struct PurgeSummary {
    /// Workflow runs returned by the horizon scanner.
    pub runs_scanned: u64,
    /// Runs skipped entirely because their head commit is tagged.
    pub runs_skipped: u64,
    /// Runs whose artifact listing or task failed.
    pub run_failures: u64,
    /// Artifacts successfully removed.
    pub deleted: u64,
    /// Artifacts exempted by recency.
    pub kept_recent: u64,
    /// Artifacts kept because they are newer than the cutoff.
    pub kept_fresh: u64,
    /// Artifacts whose deletion failed.
    pub delete_failures: u64,
}

impl PurgeSummary {
    /// Total number of artifacts kept for any reason.
    pub fn total_kept(&self) -> u64 {
        self.kept_recent + self.kept_fresh
    }

    /// Whether any part of the fan-out failed.
    pub fn has_failures(&self) -> bool {
        self.run_failures > 0 || self.delete_failures > 0
    }

    fn absorb(&mut self, outcome: &filter::RunOutcome) {
        self.deleted += outcome.deleted;
        self.kept_recent += outcome.kept_recent;
        self.kept_fresh += outcome.kept_fresh;
        self.delete_failures += outcome.delete_failures;
    }
}

/// The retention decision engine.
pub struct PurgeEngine {
    api: Arc<dyn ActionsApi>,
    deleter: Arc<dyn ArtifactDeleter>,
    policy: RetentionPolicy,
}

impl PurgeEngine {
    /// Creates an engine over an API, a deletion strategy, and a policy
    pub fn new(
        api: Arc<dyn ActionsApi>,
        deleter: Arc<dyn ArtifactDeleter>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            api,
            deleter,
            policy,
        }
    }

    /// Runs one sweep to completion.
    ///
    /// Returns an error if tag or run listing fails (nothing deleted), or if
    /// any artifact listing or deletion failed after all pending work settled.
    pub async fn run(&self) -> Result<PurgeSummary> {
        // Phase 1: tag protection set, complete before any filtering.
        let tagged_commits = if self.policy.skip_tags {
            protection::tagged_commits(self.api.as_ref()).await?
        } else {
            debug!("Tag protection disabled");
            HashSet::new()
        };

        // Phase 2: workflow runs up to the horizon, strictly page by page.
        let runs = scanner::scan_runs(self.api.as_ref(), Utc::now()).await?;

        // Phases 3/4: concurrent classification and deletion per run.
        let recent_slots = Arc::new(AtomicU32::new(0));
        let mut summary = PurgeSummary {
            runs_scanned: runs.len() as u64,
            ..Default::default()
        };
        let mut tasks = Vec::new();

        for run in runs {
            if self.policy.protects(&tagged_commits, &run) {
                info!("Skipping tagged run {} ({})", run.id, run.head_sha);
                summary.runs_skipped += 1;
                continue;
            }

            let api = Arc::clone(&self.api);
            let deleter = Arc::clone(&self.deleter);
            let policy = self.policy.clone();
            let slots = Arc::clone(&recent_slots);
            let run_id = run.id;

            let handle = tokio::spawn(filter::process_run(api, deleter, policy, slots, run));
            tasks.push((run_id, handle));
        }

        for (run_id, task) in tasks {
            match task.await {
                Ok(Ok(outcome)) => summary.absorb(&outcome),
                Ok(Err(e)) => {
                    error!("Failed to process run {}: {:#}", run_id, e);
                    summary.run_failures += 1;
                }
                Err(e) => {
                    warn!("Task for run {} panicked: {}", run_id, e);
                    summary.run_failures += 1;
                }
            }
        }

        info!(
            "Sweep complete: {} removed, {} kept ({} recent, {} fresh), {} tagged run(s) skipped",
            summary.deleted,
            summary.total_kept(),
            summary.kept_recent,
            summary.kept_fresh,
            summary.runs_skipped
        );

        if summary.has_failures() {
            anyhow::bail!(
                "{} deletion(s) and {} run(s) failed",
                summary.delete_failures,
                summary.run_failures
            );
        }

        Ok(summary)
    }
}
