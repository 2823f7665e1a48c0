//! Multi-select checkbox state.

use std::collections::{BTreeSet, HashSet};

use stork_inventory_backend::{InventoryRecord, RecordId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Select exactly `list` (the whole sorted+filtered list, not one page),
    /// or clear everything.
    pub fn select_all<'a, R, I>(&mut self, list: I, checked: bool)
    where
        R: InventoryRecord,
        I: IntoIterator<Item = &'a R>,
    {
        self.ids.clear();
        if checked {
            self.ids.extend(list.into_iter().map(InventoryRecord::id));
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn remove_all(&mut self, ids: &[RecordId]) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    /// Keep only ids that still exist after a refetch.
    pub fn retain_existing<R: InventoryRecord>(&mut self, records: &[R]) {
        if self.ids.is_empty() {
            return;
        }
        let existing: HashSet<RecordId> = records.iter().map(InventoryRecord::id).collect();
        self.ids.retain(|id| existing.contains(id));
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The "select all" checkbox: every id of a non-empty `list` is selected
    /// and nothing else is.
    pub fn all_selected(&self, list: &[&impl InventoryRecord]) -> bool {
        !list.is_empty()
            && self.ids.len() == list.len()
            && list.iter().all(|r| self.ids.contains(&r.id()))
    }

    /// Selected ids, ascending.
    pub fn ids(&self) -> Vec<RecordId> {
        self.ids.iter().copied().collect()
    }
}
