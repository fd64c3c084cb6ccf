//! Artifact listing and deletion endpoints

use reqwest::Method;

use crate::GithubClient;
use crate::error::Result;
use crate::PER_PAGE;
use scour_core::domain::Artifact;
use scour_core::dto::ArtifactsPage;

impl GithubClient {
    // =============================================================================
    // Artifact Query
    // =============================================================================

    /// List one page of a workflow run's artifacts
    ///
    /// # Arguments
    /// * `run_id` - The workflow run whose artifacts to list
    /// * `page` - 1-based page index
    ///
    /// # Returns
    /// Up to [`PER_PAGE`] artifacts; a shorter page means pagination is done
    pub async fn list_run_artifacts(&self, run_id: u64, page: u32) -> Result<Vec<Artifact>> {
        let url = format!(
            "{}/repos/{}/actions/runs/{}/artifacts?per_page={}&page={}",
            self.api_url(),
            self.repo(),
            run_id,
            PER_PAGE,
            page
        );
        let response = self.execute(Method::GET, url).await?;

        let envelope: ArtifactsPage = self.handle_response(response).await?;

        Ok(envelope.artifacts)
    }

    // =============================================================================
    // Artifact Deletion
    // =============================================================================

    /// Delete an artifact
    ///
    /// Irreversible. The API responds 204 on success.
    ///
    /// # Arguments
    /// * `artifact_id` - The artifact to delete
    pub async fn delete_artifact(&self, artifact_id: u64) -> Result<()> {
        let url = format!(
            "{}/repos/{}/actions/artifacts/{}",
            self.api_url(),
            self.repo(),
            artifact_id
        );
        let response = self.execute(Method::DELETE, url).await?;

        self.handle_empty_response(response).await
    }
}
