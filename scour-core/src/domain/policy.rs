//! Retention policy and artifact classification

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::artifact::Artifact;
use crate::domain::run::WorkflowRun;

/// Retention policy resolved from the action inputs.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    /// Cutoff timestamp: artifacts created before this are deletable.
    pub max_age: DateTime<Utc>,
    /// Whether runs whose head commit is tagged are skipped entirely.
    pub skip_tags: bool,
    /// How many artifacts, counted across the whole invocation, are exempt
    /// from deletion regardless of age.
    pub skip_recent: u32,
}

/// Outcome of classifying a single artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Artifact is older than the cutoff and not exempt.
    Delete,
    /// Artifact claimed one of the `skip_recent` exemption slots.
    KeepRecent,
    /// Artifact is not old enough to delete.
    KeepFresh,
}

impl RetentionPolicy {
    /// Classifies one artifact.
    ///
    /// `claim_recent_slot` attempts to claim one of the `skip_recent`
    /// exemption slots and reports whether it succeeded. It is invoked before
    /// the age check: an artifact that wins a slot is kept unconditionally,
    /// its age is never inspected.
    pub fn verdict(&self, artifact: &Artifact, claim_recent_slot: impl FnOnce() -> bool) -> Verdict {
        if claim_recent_slot() {
            return Verdict::KeepRecent;
        }

        if artifact.created_at < self.max_age {
            Verdict::Delete
        } else {
            Verdict::KeepFresh
        }
    }

    /// Whether a run is protected by tag protection.
    ///
    /// Protected runs are skipped at the run level: none of their artifacts
    /// are fetched or classified.
    pub fn protects(&self, tagged_commits: &HashSet<String>, run: &WorkflowRun) -> bool {
        self.skip_tags && tagged_commits.contains(&run.head_sha)
    }
}
