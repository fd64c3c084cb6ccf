//! Tag domain type

use serde::{Deserialize, Serialize};

/// A repository tag, reduced to what retention cares about: the commit it
/// points to.
///
/// A workflow run whose head commit is referenced by any tag is protected
/// from artifact deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
}
