//! Wire shapes of the GitHub REST API responses the engine consumes
//!
//! The list endpoints wrap their items differently: tags arrive as a bare
//! array, workflow runs and artifacts arrive inside `total_count` envelopes.
//! These DTOs mirror those shapes exactly; the client flattens them into the
//! domain types.

use serde::{Deserialize, Serialize};

use crate::domain::{Artifact, Tag, WorkflowRun};

/// One element of the `GET /repos/{owner}/{repo}/tags` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
    pub commit: CommitRef,
}

/// The commit a tag points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

impl From<TagRef> for Tag {
    fn from(tag: TagRef) -> Self {
        Tag {
            name: tag.name,
            commit_sha: tag.commit.sha,
        }
    }
}

/// Envelope of `GET /repos/{owner}/{repo}/actions/runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRunsPage {
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

/// Envelope of `GET /repos/{owner}/{repo}/actions/runs/{run_id}/artifacts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsPage {
    pub total_count: u64,
    pub artifacts: Vec<Artifact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tag_ref() {
        let json = r#"{ "name": "v1.2.0", "commit": { "sha": "abc123" }, "zipball_url": "ignored" }"#;
        let tag: Tag = serde_json::from_str::<TagRef>(json).unwrap().into();

        assert_eq!(tag.name, "v1.2.0");
        assert_eq!(tag.commit_sha, "abc123");
    }

    #[test]
    fn test_deserialize_workflow_runs_page() {
        let json = r#"{
            "total_count": 1,
            "workflow_runs": [
                { "id": 42, "head_sha": "abc123", "created_at": "2026-01-05T10:30:00Z", "status": "completed" }
            ]
        }"#;
        let page: WorkflowRunsPage = serde_json::from_str(json).unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.workflow_runs[0].id, 42);
        assert_eq!(page.workflow_runs[0].head_sha, "abc123");
    }

    #[test]
    fn test_deserialize_artifacts_page() {
        let json = r#"{
            "total_count": 2,
            "artifacts": [
                { "id": 7, "name": "dist", "created_at": "2026-01-05T10:30:00Z", "size_in_bytes": 2048, "expired": false },
                { "id": 8, "name": "coverage", "created_at": "2026-01-06T10:30:00Z" }
            ]
        }"#;
        let page: ArtifactsPage = serde_json::from_str(json).unwrap();

        assert_eq!(page.total_count, 2);
        assert_eq!(page.artifacts[0].size_in_bytes, 2048);
        // Missing optional fields fall back to defaults.
        assert_eq!(page.artifacts[1].size_in_bytes, 0);
        assert!(!page.artifacts[1].expired);
    }
}
