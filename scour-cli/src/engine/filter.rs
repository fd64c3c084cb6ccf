//! Artifact retention filter
//!
//! Classifies every artifact of one workflow run and issues deletions for the
//! ones that fall. Classification order within a run follows page order; the
//! recency exemption draws from a process-wide pool of slots shared by all
//! concurrently processed runs, so which artifacts win slots depends on task
//! interleaving. The pool's bound always holds.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::api::ActionsApi;
use crate::engine::deleter::ArtifactDeleter;
use crate::engine::pages;
use scour_client::PER_PAGE;
use scour_core::domain::{RetentionPolicy, Verdict, WorkflowRun};

/// Counts from classifying and deleting one run's artifacts.
#[derive(Debug, Default)]
pub(crate) struct RunOutcome {
    pub deleted: u64,
    pub kept_recent: u64,
    pub kept_fresh: u64,
    pub delete_failures: u64,
}

/// Attempts to claim one of the `limit` recency-exemption slots.
///
/// Atomic read-then-increment: the claimed count never exceeds `limit`, even
/// when several run tasks race for the last slot.
pub(crate) fn claim_recent_slot(slots: &AtomicU32, limit: u32) -> bool {
    slots
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |claimed| {
            (claimed < limit).then_some(claimed + 1)
        })
        .is_ok()
}

/// Fetches, classifies, and sweeps the artifacts of one run.
///
/// Deletions are issued concurrently and all settle before this returns; an
/// individual failure is counted, logged, and does not cancel its siblings.
pub(crate) async fn process_run(
    api: Arc<dyn ActionsApi>,
    deleter: Arc<dyn ArtifactDeleter>,
    policy: RetentionPolicy,
    recent_slots: Arc<AtomicU32>,
    run: WorkflowRun,
) -> Result<RunOutcome> {
    let artifacts = pages::collect_all(PER_PAGE as usize, |page| api.artifacts_page(run.id, page))
        .await
        .with_context(|| format!("Failed to fetch artifacts of run {}", run.id))?;

    let mut outcome = RunOutcome::default();
    let mut deletions = Vec::new();

    for artifact in artifacts {
        let verdict = policy.verdict(&artifact, || {
            claim_recent_slot(&recent_slots, policy.skip_recent)
        });

        match verdict {
            Verdict::KeepRecent => {
                info!(
                    "Skipping recent artifact (id: {}, name: {})",
                    artifact.id, artifact.name
                );
                outcome.kept_recent += 1;
            }
            Verdict::KeepFresh => {
                debug!(
                    "Keeping artifact (id: {}, name: {}): newer than the cutoff",
                    artifact.id, artifact.name
                );
                outcome.kept_fresh += 1;
            }
            Verdict::Delete => {
                let deleter = Arc::clone(&deleter);
                deletions.push(tokio::spawn(async move {
                    let result = deleter.delete(&artifact).await;
                    (artifact, result)
                }));
            }
        }
    }

    for deletion in deletions {
        match deletion.await {
            Ok((_, Ok(()))) => outcome.deleted += 1,
            Ok((artifact, Err(e))) => {
                error!(
                    "Failed to remove artifact (id: {}, name: {}): {:#}",
                    artifact.id, artifact.name, e
                );
                outcome.delete_failures += 1;
            }
            Err(e) => {
                warn!("Deletion task panicked: {}", e);
                outcome.delete_failures += 1;
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeApi, artifact, run};
    use crate::engine::deleter::GithubDeleter;
    use chrono::{Duration, Utc};

    fn policy(max_age_days: i64, skip_recent: u32) -> RetentionPolicy {
        RetentionPolicy {
            max_age: Utc::now() - Duration::days(max_age_days),
            skip_tags: true,
            skip_recent,
        }
    }

    fn harness(api: FakeApi) -> (Arc<FakeApi>, Arc<dyn ArtifactDeleter>) {
        let api = Arc::new(api);
        let deleter: Arc<dyn ArtifactDeleter> =
            Arc::new(GithubDeleter::new(Arc::clone(&api) as Arc<dyn ActionsApi>));
        (api, deleter)
    }

    #[tokio::test]
    async fn test_deletes_only_artifacts_older_than_cutoff() {
        let (api, deleter) = harness(FakeApi {
            artifacts: [(
                1,
                vec![
                    artifact(10, "old", 40),
                    artifact(11, "fresh", 10),
                    artifact(12, "older", 60),
                ],
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        });

        let outcome = process_run(
            Arc::clone(&api) as Arc<dyn ActionsApi>,
            deleter,
            policy(30, 0),
            Arc::new(AtomicU32::new(0)),
            run(1, "sha", 5),
        )
        .await
        .unwrap();

        assert_eq!(outcome.deleted, 2);
        assert_eq!(outcome.kept_fresh, 1);
        assert_eq!(outcome.kept_recent, 0);
        assert_eq!(api.deleted_ids(), vec![10, 12]);
    }

    #[tokio::test]
    async fn test_recency_exemption_takes_first_in_page_order() {
        let (api, deleter) = harness(FakeApi {
            artifacts: [(1, vec![artifact(10, "a", 40), artifact(11, "b", 40)])]
                .into_iter()
                .collect(),
            ..Default::default()
        });

        let outcome = process_run(
            Arc::clone(&api) as Arc<dyn ActionsApi>,
            deleter,
            policy(30, 1),
            Arc::new(AtomicU32::new(0)),
            run(1, "sha", 5),
        )
        .await
        .unwrap();

        // Both are old enough to delete; the first classified wins the slot.
        assert_eq!(outcome.kept_recent, 1);
        assert_eq!(outcome.deleted, 1);
        assert_eq!(api.deleted_ids(), vec![11]);
    }

    #[tokio::test]
    async fn test_recency_exemption_skips_age_check_entirely() {
        let (api, deleter) = harness(FakeApi {
            artifacts: [(1, vec![artifact(10, "ancient", 400)])].into_iter().collect(),
            ..Default::default()
        });

        let outcome = process_run(
            Arc::clone(&api) as Arc<dyn ActionsApi>,
            deleter,
            policy(30, 5),
            Arc::new(AtomicU32::new(0)),
            run(1, "sha", 5),
        )
        .await
        .unwrap();

        assert_eq!(outcome.kept_recent, 1);
        assert_eq!(outcome.deleted, 0);
        assert!(api.deleted_ids().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_does_not_cancel_siblings() {
        let (api, deleter) = harness(FakeApi {
            artifacts: [(1, vec![artifact(10, "a", 40), artifact(11, "b", 40)])]
                .into_iter()
                .collect(),
            fail_deletes: [10].into_iter().collect(),
            ..Default::default()
        });

        let outcome = process_run(
            Arc::clone(&api) as Arc<dyn ActionsApi>,
            deleter,
            policy(30, 0),
            Arc::new(AtomicU32::new(0)),
            run(1, "sha", 5),
        )
        .await
        .unwrap();

        assert_eq!(outcome.delete_failures, 1);
        assert_eq!(outcome.deleted, 1);
        assert_eq!(api.deleted_ids(), vec![11]);
    }

    #[test]
    fn test_claim_recent_slot_respects_limit() {
        let slots = AtomicU32::new(0);

        assert!(claim_recent_slot(&slots, 2));
        assert!(claim_recent_slot(&slots, 2));
        assert!(!claim_recent_slot(&slots, 2));
        assert_eq!(slots.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_claim_recent_slot_with_zero_limit_never_claims() {
        let slots = AtomicU32::new(0);
        assert!(!claim_recent_slot(&slots, 0));
        assert_eq!(slots.load(Ordering::SeqCst), 0);
    }
}
