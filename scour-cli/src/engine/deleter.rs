//! Deletion strategies
//!
//! Deletion is the one irreversible effect in the system, so it sits behind a
//! strategy trait selected once at startup: the real deleter for production,
//! a no-op deleter for dry runs. Nothing downstream branches on the mode.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::api::ActionsApi;
use scour_core::domain::Artifact;

/// Strategy for removing a single artifact.
#[async_trait]
pub trait ArtifactDeleter: Send + Sync {
    /// Deletes one artifact (or simulates doing so).
    async fn delete(&self, artifact: &Artifact) -> Result<()>;
}

/// Issues real delete calls against the API.
pub struct GithubDeleter {
    api: Arc<dyn ActionsApi>,
}

impl GithubDeleter {
    /// Creates a deleter backed by the real API
    pub fn new(api: Arc<dyn ActionsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ArtifactDeleter for GithubDeleter {
    async fn delete(&self, artifact: &Artifact) -> Result<()> {
        self.api.delete_artifact(artifact.id).await?;

        info!(
            "Successfully removed artifact (id: {}, name: {})",
            artifact.id, artifact.name
        );

        Ok(())
    }
}

/// Resolves every deletion successfully without contacting the API.
pub struct DryRunDeleter;

#[async_trait]
impl ArtifactDeleter for DryRunDeleter {
    async fn delete(&self, artifact: &Artifact) -> Result<()> {
        info!(
            "Dry run: leaving artifact (id: {}, name: {}) in place",
            artifact.id, artifact.name
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{FakeApi, artifact};

    #[tokio::test]
    async fn test_github_deleter_deletes_through_api() {
        let api = Arc::new(FakeApi::default());
        let deleter = GithubDeleter::new(Arc::clone(&api) as Arc<dyn ActionsApi>);

        deleter.delete(&artifact(7, "dist", 40)).await.unwrap();

        assert_eq!(api.deleted_ids(), vec![7]);
    }

    #[tokio::test]
    async fn test_github_deleter_propagates_failure() {
        let api = Arc::new(FakeApi {
            fail_deletes: [7].into_iter().collect(),
            ..Default::default()
        });
        let deleter = GithubDeleter::new(Arc::clone(&api) as Arc<dyn ActionsApi>);

        assert!(deleter.delete(&artifact(7, "dist", 40)).await.is_err());
        assert!(api.deleted_ids().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_deleter_touches_nothing() {
        let deleter = DryRunDeleter;
        assert!(deleter.delete(&artifact(7, "dist", 40)).await.is_ok());
    }
}
