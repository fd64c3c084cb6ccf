//! Tag listing endpoint

use reqwest::Method;

use crate::GithubClient;
use crate::error::Result;
use crate::PER_PAGE;
use scour_core::domain::Tag;
use scour_core::dto::TagRef;

impl GithubClient {
    /// List one page of repository tags
    ///
    /// Tags are the raw material of tag protection: each tag's commit sha
    /// marks a workflow-run head commit whose artifacts must not be deleted.
    ///
    /// # Arguments
    /// * `page` - 1-based page index
    ///
    /// # Returns
    /// Up to [`PER_PAGE`] tags; a shorter page means pagination is done
    pub async fn list_tags(&self, page: u32) -> Result<Vec<Tag>> {
        let url = format!(
            "{}/repos/{}/tags?per_page={}&page={}",
            self.api_url(),
            self.repo(),
            PER_PAGE,
            page
        );
        let response = self.execute(Method::GET, url).await?;

        let tags: Vec<TagRef> = self.handle_response(response).await?;

        Ok(tags.into_iter().map(Tag::from).collect())
    }
}
