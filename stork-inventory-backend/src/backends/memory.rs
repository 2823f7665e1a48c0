//! In-process backend, used for offline mode and tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{BackendError, Result};
use crate::traits::{InstalledSoftwareSource, RecordBackend};
use crate::types::{InstalledSoftware, InventoryRecord, RecordId, RecordMeta};

use super::{matches_search, merge_by_id_desc};

const BACKEND_NAME: &str = "memory";

/// `RwLock`-guarded table of one record type.
pub struct InMemoryBackend<R: InventoryRecord> {
    rows: RwLock<BTreeMap<RecordId, R>>,
    next_id: AtomicI64,
    software: Option<Arc<dyn InstalledSoftwareSource>>,
}

impl<R: InventoryRecord> Default for InMemoryBackend<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: InventoryRecord> InMemoryBackend<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            software: None,
        }
    }

    /// Seed the table; new ids continue after the largest seeded id.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let rows: BTreeMap<RecordId, R> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next = rows.keys().next_back().map_or(1, |max| max + 1);
        Self {
            rows: RwLock::new(rows),
            next_id: AtomicI64::new(next),
            software: None,
        }
    }

    /// Union installed-software matches into search results (PC table).
    #[must_use]
    pub fn with_software(mut self, software: Arc<dyn InstalledSoftwareSource>) -> Self {
        self.software = Some(software);
        self
    }

    /// Current rows, `id` descending.
    pub async fn snapshot(&self) -> Vec<R> {
        self.rows.read().await.values().rev().cloned().collect()
    }

    fn not_found(id: RecordId) -> BackendError {
        BackendError::NotFound {
            backend: BACKEND_NAME.to_string(),
            resource: format!("{}#{id}", R::descriptor().table()),
            raw_message: None,
        }
    }

    async fn set_hidden(&self, ids: &[RecordId], hidden: bool) {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        // 与 PostgREST `in.(...)` 一致：不存在的 id 静默忽略
        for id in ids {
            if let Some(row) = rows.get_mut(id) {
                row.set_hidden(hidden, now);
            }
        }
    }
}

#[async_trait]
impl<R: InventoryRecord> RecordBackend<R> for InMemoryBackend<R> {
    fn id(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn list_all(&self) -> Result<Vec<R>> {
        Ok(self.snapshot().await)
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = R::materialize(RecordMeta::new(id, Utc::now()), draft.clone());
        self.rows.write().await.insert(id, record.clone());
        log::debug!("[{BACKEND_NAME}] inserted {}#{id}", R::descriptor().table());
        Ok(record)
    }

    async fn update(&self, id: RecordId, draft: &R::Draft) -> Result<R> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        row.apply_draft(draft.clone(), Utc::now());
        Ok(row.clone())
    }

    async fn hide(&self, ids: &[RecordId]) -> Result<()> {
        self.set_hidden(ids, true).await;
        Ok(())
    }

    async fn restore(&self, ids: &[RecordId]) -> Result<()> {
        self.set_hidden(ids, false).await;
        Ok(())
    }

    async fn permanent_delete(&self, ids: &[RecordId]) -> Result<()> {
        let mut rows = self.rows.write().await;
        for id in ids {
            rows.remove(id);
        }
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<R>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_all().await;
        }
        let needle = query.to_lowercase();

        let software_ids: HashSet<RecordId> = match &self.software {
            Some(source) => source.search_record_ids(query).await?.into_iter().collect(),
            None => HashSet::new(),
        };

        let rows = self.rows.read().await;
        let primary: Vec<R> = rows
            .values()
            .rev()
            .filter(|r| matches_search(*r, &needle))
            .cloned()
            .collect();
        let extra: Vec<R> = software_ids
            .iter()
            .filter_map(|id| rows.get(id))
            .cloned()
            .collect();
        Ok(merge_by_id_desc(primary, extra))
    }
}

/// In-process `installed_software` table.
#[derive(Default)]
pub struct InMemorySoftwareSource {
    rows: RwLock<Vec<InstalledSoftware>>,
}

impl InMemorySoftwareSource {
    pub fn new(rows: Vec<InstalledSoftware>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl InstalledSoftwareSource for InMemorySoftwareSource {
    async fn list_by_record(&self, pc_id: RecordId) -> Result<Vec<InstalledSoftware>> {
        let mut list: Vec<InstalledSoftware> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|s| s.pcinfo_id == pc_id)
            .cloned()
            .collect();
        // PostgREST 升序排序时 NULL 排最后
        list.sort_by(|a, b| match (&a.software_name, &b.software_name) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(list)
    }

    async fn search_record_ids(&self, query: &str) -> Result<Vec<RecordId>> {
        let needle = query.trim().to_lowercase();
        let mut seen = HashSet::new();
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|s| s.matches(&needle))
            .map(|s| s.pcinfo_id)
            .filter(|id| seen.insert(*id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PcDraft, PcRecord, PrinterDraft, PrinterRecord};

    fn printer(brand: &str, model: &str, ip: &str) -> PrinterDraft {
        PrinterDraft {
            brand: Some(brand.to_string()),
            model: Some(model.to_string()),
            ip_address: Some(ip.to_string()),
            ..Default::default()
        }
    }

    fn pc(name: &str) -> PcDraft {
        PcDraft {
            computer_name: Some(name.to_string()),
            cpu_name: Some("i5".to_string()),
            ..Default::default()
        }
    }

    fn software(id: RecordId, pc_id: RecordId, name: &str) -> InstalledSoftware {
        InstalledSoftware {
            id,
            pcinfo_id: pc_id,
            software_name: Some(name.to_string()),
            version: None,
            publisher: None,
            install_date: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn list_all_newest_first() {
        let backend = InMemoryBackend::<PrinterRecord>::new();
        backend.create(&printer("HP", "A", "10.0.0.1")).await.unwrap();
        backend.create(&printer("HP", "B", "10.0.0.2")).await.unwrap();
        let ids: Vec<_> = backend.list_all().await.unwrap().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn hide_and_restore_stamp_hidden_at() {
        let backend = InMemoryBackend::<PrinterRecord>::new();
        let created = backend.create(&printer("HP", "A", "")).await.unwrap();

        backend.hide(&[created.id()]).await.unwrap();
        let row = &backend.snapshot().await[0];
        assert!(row.is_hidden());
        assert!(row.hidden_at().is_some());

        backend.restore(&[created.id()]).await.unwrap();
        let row = &backend.snapshot().await[0];
        assert!(!row.is_hidden());
        assert!(row.hidden_at().is_none());
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let backend = InMemoryBackend::<PrinterRecord>::new();
        let err = backend.update(99, &printer("HP", "A", "")).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
        assert!(err.is_expected());
    }

    #[tokio::test]
    async fn permanent_delete_removes_rows() {
        let backend = InMemoryBackend::<PrinterRecord>::new();
        for m in ["A", "B", "C"] {
            backend.create(&printer("HP", m, "")).await.unwrap();
        }
        backend.permanent_delete(&[1, 3]).await.unwrap();
        let ids: Vec<_> = backend.snapshot().await.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let backend = InMemoryBackend::<PrinterRecord>::new();
        backend.create(&printer("Brother", "HL-L2350", "10.1.1.1")).await.unwrap();
        backend.create(&printer("HP", "M404", "10.1.1.2")).await.unwrap();

        let hits = backend.search("hl-l").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].data.brand.as_deref(), Some("Brother"));

        assert_eq!(backend.search("10.1.1").await.unwrap().len(), 2);
        assert_eq!(backend.search("   ").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pc_search_unions_installed_software() {
        let software = Arc::new(InMemorySoftwareSource::new(vec![
            software(1, 1, "AutoCAD 2024"),
            software(2, 3, "AutoCAD LT"),
            software(3, 3, "7-Zip"),
        ]));
        let backend = InMemoryBackend::<PcRecord>::new().with_software(software);
        backend.create(&pc("CAD-01")).await.unwrap();
        backend.create(&pc("ACCT-02")).await.unwrap();
        backend.create(&pc("DESIGN-03")).await.unwrap();
        backend.create(&pc("AUTOCAD-LAB")).await.unwrap();

        let ids: Vec<_> = backend
            .search("autocad")
            .await
            .unwrap()
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(ids, vec![4, 3, 1]);
    }

    #[tokio::test]
    async fn software_listing_sorted_by_name() {
        let source = InMemorySoftwareSource::new(vec![
            software(1, 7, "Zoom"),
            software(2, 7, "Chrome"),
            software(3, 8, "Excel"),
        ]);
        let names: Vec<_> = source
            .list_by_record(7)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|s| s.software_name)
            .collect();
        assert_eq!(names, vec!["Chrome", "Zoom"]);
        assert_eq!(source.search_record_ids("o").await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn seeded_ids_continue() {
        let seeded = PrinterRecord {
            meta: RecordMeta::new(41, Utc::now()),
            data: printer("HP", "A", ""),
        };
        let backend = InMemoryBackend::with_records(vec![seeded]);
        let created = backend.create(&printer("HP", "B", "")).await.unwrap();
        assert_eq!(created.id(), 42);
    }
}
