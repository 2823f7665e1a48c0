use async_trait::async_trait;

use crate::error::Result;
use crate::types::{InstalledSoftware, InventoryRecord, RecordId};

/// CRUD + search collaborator for one entity type.
///
/// Every listing (`list_all`, `search`) is ordered by `id` descending so the
/// newest record comes first. Lifecycle operations take a slice of ids and
/// are issued as a single batched call.
#[async_trait]
pub trait RecordBackend<R: InventoryRecord>: Send + Sync {
    /// Backend identifier (used in logs and errors).
    fn id(&self) -> &'static str;

    /// Fetch the whole table.
    async fn list_all(&self) -> Result<Vec<R>>;

    /// Insert a row and return it as stored.
    async fn create(&self, draft: &R::Draft) -> Result<R>;

    /// Overwrite the writable columns of row `id` and return it as stored.
    async fn update(&self, id: RecordId, draft: &R::Draft) -> Result<R>;

    /// Soft-delete: `is_hidden = true`, `hidden_at = now`.
    async fn hide(&self, ids: &[RecordId]) -> Result<()>;

    /// Undo a soft-delete: `is_hidden = false`, `hidden_at = null`.
    async fn restore(&self, ids: &[RecordId]) -> Result<()>;

    /// Remove rows irrecoverably.
    async fn permanent_delete(&self, ids: &[RecordId]) -> Result<()>;

    /// Case-insensitive substring search across the descriptor's search
    /// fields. A blank query behaves as [`list_all`](Self::list_all).
    async fn search(&self, query: &str) -> Result<Vec<R>>;
}

/// Read-only access to the per-PC installed software inventory.
#[async_trait]
pub trait InstalledSoftwareSource: Send + Sync {
    /// Software installed on PC `pc_id`, ordered by software name.
    async fn list_by_record(&self, pc_id: RecordId) -> Result<Vec<InstalledSoftware>>;

    /// Distinct PC ids with software whose name, version or publisher
    /// contains `query` (case-insensitive).
    async fn search_record_ids(&self, query: &str) -> Result<Vec<RecordId>>;
}
