//! Sort engine: stable, non-mutating multi-field ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use stork_inventory_backend::{FieldValue, InventoryRecord, RecordField};

use crate::utils::ip::compare_ip;

/// A sortable column: a record field or one of the lifecycle columns shown
/// in hidden mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey<F> {
    Field(F),
    /// `is_hidden`
    Hidden,
    /// `hidden_at`
    HiddenAt,
}

impl<F: RecordField> SortKey<F> {
    /// Column name, as the UI reports it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Field(f) => f.name(),
            Self::Hidden => "is_hidden",
            Self::HiddenAt => "hidden_at",
        }
    }

    /// Parse a column name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "is_hidden" => Some(Self::Hidden),
            "hidden_at" => Some(Self::HiddenAt),
            _ => F::from_name(name).map(Self::Field),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Apply the direction to an ascending comparison result.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<F> {
    pub key: SortKey<F>,
    pub direction: SortDirection,
}

/// Column-header click state. `None` keeps fetch order (newest id first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    spec: Option<SortSpec<F>>,
}

impl<F> Default for SortState<F> {
    fn default() -> Self {
        Self { spec: None }
    }
}

impl<F: Copy + PartialEq> SortState<F> {
    /// Same key toggles ascending → descending (and back); a new key starts
    /// ascending.
    pub fn request(&mut self, key: SortKey<F>) {
        let direction = match self.spec {
            Some(SortSpec {
                key: current,
                direction: SortDirection::Ascending,
            }) if current == key => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.spec = Some(SortSpec { key, direction });
    }

    pub fn spec(&self) -> Option<SortSpec<F>> {
        self.spec
    }

    /// Direction for `key` if it is the active sort column (header arrow).
    pub fn indicator(&self, key: SortKey<F>) -> Option<SortDirection> {
        self.spec.filter(|s| s.key == key).map(|s| s.direction)
    }

    pub fn clear(&mut self) {
        self.spec = None;
    }
}

/// Ascending comparison of two field values of the same column.
///
/// Numbers, dates and timestamps put missing values first. Text compares
/// case-insensitively with missing text as `""`.
pub fn compare_values(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => match (x, y) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => x.is_some().cmp(&y.is_some()),
        },
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(&y),
        (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(&y),
        (FieldValue::Flag(x), FieldValue::Flag(y)) => x.cmp(&y),
        (x, y) => compare_text(x.as_text(), y.as_text()),
    }
}

fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or_default();
    let b = b.unwrap_or_default();
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Ascending comparison of two records on `key`.
pub fn compare_records<R: InventoryRecord>(a: &R, b: &R, key: SortKey<R::Field>) -> Ordering {
    match key {
        SortKey::Hidden => a.is_hidden().cmp(&b.is_hidden()),
        SortKey::HiddenAt => a.hidden_at().cmp(&b.hidden_at()),
        SortKey::Field(f) if f == R::descriptor().ip_field => {
            compare_ip(a.field(f).as_text(), b.field(f).as_text())
        }
        SortKey::Field(f) => compare_values(a.field(f), b.field(f)),
    }
}

/// Order `records` by `spec`. Stable; `None` returns the input order.
pub fn sort<'a, R, I>(records: I, spec: Option<SortSpec<R::Field>>) -> Vec<&'a R>
where
    R: InventoryRecord,
    I: IntoIterator<Item = &'a R>,
{
    let mut out: Vec<&R> = records.into_iter().collect();
    if let Some(SortSpec { key, direction }) = spec {
        out.sort_by(|a, b| direction.apply(compare_records(*a, *b, key)));
    }
    out
}
