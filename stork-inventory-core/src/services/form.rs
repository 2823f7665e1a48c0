//! Create / edit form state.

use serde::Serialize;
use stork_inventory_backend::{PrinterDraft, RecordId};

/// Draft under edit. `editing_id` is `Some` when editing an existing record
/// and `None` for a new record (including "clone as new").
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftForm<D> {
    pub editing_id: Option<RecordId>,
    pub draft: D,
}

impl<D: Default> DraftForm<D> {
    pub fn blank() -> Self {
        Self {
            editing_id: None,
            draft: D::default(),
        }
    }
}

impl<D> DraftForm<D> {
    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }
}

/// Append `[碳粉更換: YYYY-MM-DD]` to the printer's notes so the previous
/// replacement date is kept once the date field is overwritten.
/// No-op (returns `false`) when no date is set.
pub fn archive_toner_date(draft: &mut PrinterDraft) -> bool {
    let Some(date) = draft.toner_replaced_at else {
        return false;
    };
    let entry = format!("[碳粉更換: {}]", date.format("%Y-%m-%d"));
    draft.notes = Some(match draft.notes.take().filter(|n| !n.is_empty()) {
        Some(notes) => format!("{notes} {entry}"),
        None => entry,
    });
    true
}
