//! Tag protection set
//!
//! Collects the commit shas referenced by every repository tag. The set must
//! be complete before any filtering starts, since a partial set could let the
//! engine delete artifacts of a protected run. Any page failure here is fatal
//! for the whole sweep.

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::ActionsApi;
use crate::engine::pages;
use scour_client::PER_PAGE;

/// Fetches all tags and projects them to their commit shas.
pub(crate) async fn tagged_commits(api: &dyn ActionsApi) -> Result<HashSet<String>> {
    let tags = pages::collect_all(PER_PAGE as usize, |page| api.tags_page(page))
        .await
        .context("Failed to fetch repository tags")?;

    let commits: HashSet<String> = tags.into_iter().map(|tag| tag.commit_sha).collect();

    info!("Tag protection covers {} commit(s)", commits.len());

    Ok(commits)
}
