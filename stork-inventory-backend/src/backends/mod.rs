//! Backend implementations

mod memory;
mod rest;

pub use memory::{InMemoryBackend, InMemorySoftwareSource};
pub use rest::{RestBackend, RestConfig, RestInstalledSoftware};

use std::collections::HashSet;

use crate::types::{InventoryRecord, RecordId};

/// Union two result sets: `primary` rows win on duplicate ids, output is `id`
/// descending.
pub(crate) fn merge_by_id_desc<R: InventoryRecord>(primary: Vec<R>, extra: Vec<R>) -> Vec<R> {
    let mut seen: HashSet<RecordId> = HashSet::with_capacity(primary.len() + extra.len());
    let mut merged: Vec<R> = primary
        .into_iter()
        .chain(extra)
        .filter(|r| seen.insert(r.id()))
        .collect();
    merged.sort_by(|a, b| b.id().cmp(&a.id()));
    merged
}

/// Whether any of the record's search fields contains `needle_lower`.
pub(crate) fn matches_search<R: InventoryRecord>(record: &R, needle_lower: &str) -> bool {
    R::descriptor().search_fields.iter().any(|&field| {
        record
            .field(field)
            .to_search_text()
            .is_some_and(|text| text.to_lowercase().contains(needle_lower))
    })
}
