//! Drives a panel's debounced search box.

use std::sync::Arc;

use stork_inventory_backend::InventoryRecord;
use stork_inventory_core::InventoryPanel;
use stork_inventory_core::services::QueryDebouncer;
use tokio::sync::Mutex;

/// Issue one fetch per settled query until the sender is dropped.
///
/// The panel lock is released while the request is in flight, so a newer
/// query may be issued meanwhile; the older response is then discarded by
/// the panel.
pub async fn run_search_loop<R: InventoryRecord>(
    panel: Arc<Mutex<InventoryPanel<R>>>,
    mut debouncer: QueryDebouncer,
) {
    while let Some(query) = debouncer.next_settled().await {
        let (ticket, backend) = {
            let mut guard = panel.lock().await;
            (guard.begin_search(&query), guard.backend())
        };
        let result = ticket.fetch(backend.as_ref()).await;
        if let Err(e) = panel.lock().await.finish_search(&ticket, result) {
            log::debug!("Search for {:?} failed: {e}", ticket.query());
        }
    }
}
