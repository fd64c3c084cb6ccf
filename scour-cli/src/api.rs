//! API seam
//!
//! A thin trait over the GitHub endpoints the engine touches. The engine
//! drives pagination itself, so the trait exposes single pages plus the
//! delete call, nothing more. Trait-based to enable testing with in-memory
//! fakes.

use anyhow::Result;
use async_trait::async_trait;

use scour_client::GithubClient;
use scour_core::domain::{Artifact, Tag, WorkflowRun};

/// The remote surface consumed by the retention engine.
#[async_trait]
pub trait ActionsApi: Send + Sync {
    /// Fetches one page of repository tags.
    async fn tags_page(&self, page: u32) -> Result<Vec<Tag>>;

    /// Fetches one page of workflow runs, newest first.
    async fn runs_page(&self, page: u32) -> Result<Vec<WorkflowRun>>;

    /// Fetches one page of a run's artifacts.
    async fn artifacts_page(&self, run_id: u64, page: u32) -> Result<Vec<Artifact>>;

    /// Deletes an artifact.
    async fn delete_artifact(&self, artifact_id: u64) -> Result<()>;
}

/// Production implementation backed by [`GithubClient`].
pub struct GithubActionsApi {
    client: GithubClient,
}

impl GithubActionsApi {
    /// Creates the API seam over a configured client
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ActionsApi for GithubActionsApi {
    async fn tags_page(&self, page: u32) -> Result<Vec<Tag>> {
        Ok(self.client.list_tags(page).await?)
    }

    async fn runs_page(&self, page: u32) -> Result<Vec<WorkflowRun>> {
        Ok(self.client.list_workflow_runs(page).await?)
    }

    async fn artifacts_page(&self, run_id: u64, page: u32) -> Result<Vec<Artifact>> {
        Ok(self.client.list_run_artifacts(run_id, page).await?)
    }

    async fn delete_artifact(&self, artifact_id: u64) -> Result<()> {
        Ok(self.client.delete_artifact(artifact_id).await?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`ActionsApi`] fake shared by the engine tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use chrono::{Duration, Utc};

    use super::*;
    use scour_client::PER_PAGE;

    /// In-memory API fake. Pages are served in [`PER_PAGE`] slices, matching
    /// the real endpoints.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub tags: Vec<Tag>,
        pub runs: Vec<WorkflowRun>,
        pub artifacts: HashMap<u64, Vec<Artifact>>,
        /// Artifact ids to fail deletion for
        pub fail_deletes: HashSet<u64>,
        /// When set, every tags page fetch fails
        pub fail_tags: bool,
        /// Successfully deleted artifact ids, in completion order
        pub deleted: Mutex<Vec<u64>>,
        /// Run ids whose artifacts were listed
        pub artifact_fetches: Mutex<Vec<u64>>,
        /// Number of workflow-run pages served
        pub runs_pages_fetched: AtomicU32,
    }

    impl FakeApi {
        pub fn deleted_ids(&self) -> Vec<u64> {
            let mut ids = self.deleted.lock().unwrap().clone();
            ids.sort_unstable();
            ids
        }

        pub fn artifact_fetched_runs(&self) -> Vec<u64> {
            let mut ids = self.artifact_fetches.lock().unwrap().clone();
            ids.sort_unstable();
            ids.dedup();
            ids
        }
    }

    fn page_slice<T: Clone>(items: &[T], page: u32) -> Vec<T> {
        let start = (page.saturating_sub(1) as usize) * PER_PAGE as usize;
        items
            .iter()
            .skip(start)
            .take(PER_PAGE as usize)
            .cloned()
            .collect()
    }

    #[async_trait]
    impl ActionsApi for FakeApi {
        async fn tags_page(&self, page: u32) -> Result<Vec<Tag>> {
            if self.fail_tags {
                anyhow::bail!("injected tag listing failure");
            }
            Ok(page_slice(&self.tags, page))
        }

        async fn runs_page(&self, page: u32) -> Result<Vec<WorkflowRun>> {
            self.runs_pages_fetched.fetch_add(1, Ordering::SeqCst);
            Ok(page_slice(&self.runs, page))
        }

        async fn artifacts_page(&self, run_id: u64, page: u32) -> Result<Vec<Artifact>> {
            self.artifact_fetches.lock().unwrap().push(run_id);
            let artifacts = self.artifacts.get(&run_id).cloned().unwrap_or_default();
            Ok(page_slice(&artifacts, page))
        }

        async fn delete_artifact(&self, artifact_id: u64) -> Result<()> {
            if self.fail_deletes.contains(&artifact_id) {
                anyhow::bail!("injected deletion failure for artifact {artifact_id}");
            }
            self.deleted.lock().unwrap().push(artifact_id);
            Ok(())
        }
    }

    pub(crate) fn tag(name: &str, commit_sha: &str) -> Tag {
        Tag {
            name: name.to_string(),
            commit_sha: commit_sha.to_string(),
        }
    }

    pub(crate) fn run(id: u64, head_sha: &str, days_ago: i64) -> WorkflowRun {
        WorkflowRun {
            id,
            head_sha: head_sha.to_string(),
            created_at: Utc::now() - Duration::days(days_ago),
        }
    }

    pub(crate) fn artifact(id: u64, name: &str, days_ago: i64) -> Artifact {
        Artifact {
            id,
            name: name.to_string(),
            created_at: Utc::now() - Duration::days(days_ago),
            size_in_bytes: 1024,
            expired: false,
        }
    }
}
