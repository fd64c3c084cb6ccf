//! Workflow run domain type

use serde::{Deserialize, Serialize};

/// One execution of a CI pipeline, as listed by the workflow runs endpoint.
///
/// Immutable once fetched. Runs are returned by the API in descending
/// `created_at` order, which the horizon scanner relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    /// Head commit of the run; matched against tag commits for protection.
    pub head_sha: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
