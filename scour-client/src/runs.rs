//! Workflow run listing endpoint

use reqwest::Method;

use crate::GithubClient;
use crate::error::Result;
use crate::PER_PAGE;
use scour_core::domain::WorkflowRun;
use scour_core::dto::WorkflowRunsPage;

impl GithubClient {
    /// List one page of workflow runs, newest first
    ///
    /// The API returns runs in descending `created_at` order; the horizon
    /// scanner depends on that ordering to stop paginating once a page
    /// reaches past the lookback window.
    ///
    /// # Arguments
    /// * `page` - 1-based page index
    ///
    /// # Returns
    /// Up to [`PER_PAGE`] runs; a shorter page means pagination is done
    pub async fn list_workflow_runs(&self, page: u32) -> Result<Vec<WorkflowRun>> {
        let url = format!(
            "{}/repos/{}/actions/runs?per_page={}&page={}",
            self.api_url(),
            self.repo(),
            PER_PAGE,
            page
        );
        let response = self.execute(Method::GET, url).await?;

        let envelope: WorkflowRunsPage = self.handle_response(response).await?;

        Ok(envelope.workflow_runs)
    }
}
