//! Artifact domain type

use serde::{Deserialize, Serialize};

/// A build output attached to a single workflow run.
///
/// Deletion is a terminal effect, not a field: an artifact that has been
/// removed simply stops appearing in listings. Artifacts that GitHub has
/// already expired are still listed (with `expired` set) and still accept
/// a delete call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub id: u64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub size_in_bytes: u64,
    #[serde(default)]
    pub expired: bool,
}
