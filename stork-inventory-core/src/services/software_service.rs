//! Installed-software lookup for the PC detail view.

use std::sync::Arc;

use log::warn;
use stork_inventory_backend::{InstalledSoftware, InstalledSoftwareSource, RecordId};

/// Read-only software inventory service
pub struct SoftwareService {
    source: Arc<dyn InstalledSoftwareSource>,
}

impl SoftwareService {
    #[must_use]
    pub fn new(source: Arc<dyn InstalledSoftwareSource>) -> Self {
        Self { source }
    }

    /// Software installed on PC `pc_id`, by name.
    ///
    /// A failed lookup is logged and yields an empty list so the editor can
    /// still open.
    pub async fn list_for(&self, pc_id: RecordId) -> Vec<InstalledSoftware> {
        match self.source.list_by_record(pc_id).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Failed to load installed software for PC #{pc_id}: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use stork_inventory_backend::{InMemorySoftwareSource, Result};

    use super::*;
    use crate::test_utils::network_error;

    fn row(id: RecordId, pc: RecordId, name: &str) -> InstalledSoftware {
        InstalledSoftware {
            id,
            pcinfo_id: pc,
            software_name: Some(name.to_string()),
            version: None,
            publisher: None,
            install_date: None,
            created_at: None,
        }
    }

    struct Broken;

    #[async_trait]
    impl InstalledSoftwareSource for Broken {
        async fn list_by_record(&self, _pc_id: RecordId) -> Result<Vec<InstalledSoftware>> {
            Err(network_error("down"))
        }

        async fn search_record_ids(&self, _query: &str) -> Result<Vec<RecordId>> {
            Err(network_error("down"))
        }
    }

    #[tokio::test]
    async fn lists_rows_for_one_pc() {
        let source = InMemorySoftwareSource::new(vec![
            row(1, 3, "Office"),
            row(2, 4, "Chrome"),
            row(3, 3, "7-Zip"),
        ]);
        let service = SoftwareService::new(Arc::new(source));
        let names: Vec<_> = service
            .list_for(3)
            .await
            .into_iter()
            .filter_map(|s| s.software_name)
            .collect();
        assert_eq!(names, vec!["7-Zip", "Office"]);
    }

    #[tokio::test]
    async fn failure_yields_empty_list() {
        let service = SoftwareService::new(Arc::new(Broken));
        assert!(service.list_for(3).await.is_empty());
    }
}
