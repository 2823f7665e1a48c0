use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::RecordId;

/// Table holding per-PC software inventory.
pub const INSTALLED_SOFTWARE_TABLE: &str = "installed_software";

/// One row of the `installed_software` table (read-only from this client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledSoftware {
    pub id: RecordId,
    /// The owning `pcinfo.id`.
    pub pcinfo_id: RecordId,
    #[serde(default)]
    pub software_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    /// Vendor-formatted install date as reported by the agent.
    #[serde(default)]
    pub install_date: Option<String>,
    #[serde(default, with = "crate::utils::datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl InstalledSoftware {
    /// Case-insensitive substring match over name, version and publisher.
    pub fn matches(&self, needle_lower: &str) -> bool {
        [&self.software_name, &self.version, &self.publisher]
            .into_iter()
            .flatten()
            .any(|v| v.to_lowercase().contains(needle_lower))
    }
}
