//! Visibility filter: active vs hidden partition.

use stork_inventory_backend::InventoryRecord;

/// Records whose `is_hidden` equals `hidden_mode`, in input order.
pub fn filter_visibility<'a, R, I>(records: I, hidden_mode: bool) -> Vec<&'a R>
where
    R: InventoryRecord,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|r| r.is_hidden() == hidden_mode)
        .collect()
}

/// `(active, hidden)` counts.
pub fn visibility_counts<R: InventoryRecord>(records: &[R]) -> (usize, usize) {
    let hidden = records.iter().filter(|r| r.is_hidden()).count();
    (records.len() - hidden, hidden)
}
