//! Hide / restore / permanent-delete orchestration.

use serde::Serialize;
use stork_inventory_backend::{InventoryRecord, RecordBackend, RecordId};

use crate::engine::{ConfirmationGate, LifecycleAction};
use crate::error::{CoreError, CoreResult};

/// What an open confirmation dialog will act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "ids", rename_all = "snake_case")]
pub enum LifecycleTarget {
    Single(RecordId),
    Bulk(Vec<RecordId>),
}

impl LifecycleTarget {
    pub fn ids(&self) -> &[RecordId] {
        match self {
            Self::Single(id) => std::slice::from_ref(id),
            Self::Bulk(ids) => ids,
        }
    }

    pub fn is_bulk(&self) -> bool {
        matches!(self, Self::Bulk(_))
    }
}

/// An open confirmation dialog: gate + target + display name of a single
/// target (empty for bulk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub gate: ConfirmationGate,
    pub target: LifecycleTarget,
    pub name: String,
}

impl PendingAction {
    pub fn new(action: LifecycleAction, target: LifecycleTarget, name: String) -> Self {
        Self {
            gate: ConfirmationGate::new(action),
            target,
            name,
        }
    }

    pub fn action(&self) -> LifecycleAction {
        self.gate.action()
    }
}

/// Check that record `id` exists in `records` and may take `action`.
pub fn check_transition<R: InventoryRecord>(
    records: &[R],
    action: LifecycleAction,
    id: RecordId,
) -> CoreResult<&R> {
    let record = records
        .iter()
        .find(|r| r.id() == id)
        .ok_or(CoreError::RecordNotFound(id))?;
    if action.allowed_from(record.is_hidden()) {
        Ok(record)
    } else {
        Err(CoreError::InvalidTransition { action, id })
    }
}

/// One batched backend call for `action` over `ids`.
pub async fn execute<R: InventoryRecord>(
    backend: &dyn RecordBackend<R>,
    action: LifecycleAction,
    ids: &[RecordId],
) -> stork_inventory_backend::Result<()> {
    match action {
        LifecycleAction::Hide => backend.hide(ids).await,
        LifecycleAction::Restore => backend.restore(ids).await,
        LifecycleAction::PermanentDelete => backend.permanent_delete(ids).await,
    }
}
