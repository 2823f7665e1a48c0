use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Backend-assigned row identifier (bigint identity; larger means newer).
pub type RecordId = i64;

// ============ Record kind ============

/// The three inventory entity types, one management panel each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Desktop / laptop computers.
    Pc,
    /// Printers.
    Printer,
    /// Switches, routers, access points, ...
    Network,
}

impl RecordKind {
    /// Backend table name.
    pub const fn table(self) -> &'static str {
        match self {
            Self::Pc => "pcinfo",
            Self::Printer => "printers",
            Self::Network => "network_equipment",
        }
    }
}

// ============ Field values ============

/// Typed, borrowed view of a single record field.
///
/// Sorting, validation, search and export all read records through this
/// enum instead of reaching into concrete structs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Free text. Empty strings are reported as `None`.
    Text(Option<&'a str>),
    /// Numeric column (`ram_gb`, `vga_ram_mb`).
    Number(Option<f64>),
    /// Calendar date column.
    Date(Option<NaiveDate>),
    /// Backend timestamp column.
    Timestamp(Option<DateTime<Utc>>),
    /// Boolean column.
    Flag(bool),
}

impl<'a> FieldValue<'a> {
    /// Wrap an optional string, folding `""` into `None`.
    pub fn text(value: Option<&'a str>) -> Self {
        Self::Text(value.filter(|s| !s.is_empty()))
    }

    /// Whether the value is absent.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(v) => v.is_none(),
            Self::Number(v) => v.is_none(),
            Self::Date(v) => v.is_none(),
            Self::Timestamp(v) => v.is_none(),
            Self::Flag(_) => false,
        }
    }

    /// The text payload, if this is a non-empty text value.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Self::Text(v) => *v,
            _ => None,
        }
    }

    /// Plain string rendering used for substring search.
    pub fn to_search_text(&self) -> Option<String> {
        match self {
            Self::Text(v) => v.map(ToString::to_string),
            Self::Number(v) => v.map(|n| n.to_string()),
            Self::Date(v) => v.map(|d| d.format("%Y-%m-%d").to_string()),
            Self::Timestamp(v) => v.map(|t| t.to_rfc3339()),
            Self::Flag(b) => Some(b.to_string()),
        }
    }
}

// ============ Descriptor ============

/// Column enum of one record type.
pub trait RecordField: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Wire (column) name.
    fn name(self) -> &'static str;

    /// Every column, in form order.
    fn all() -> &'static [Self];

    /// Look up a column by its wire name.
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }
}

/// Per-entity type descriptor that parameterizes the generic list engine.
#[derive(Debug)]
pub struct RecordDescriptor<F: 'static> {
    /// Entity kind.
    pub kind: RecordKind,
    /// Fields that together identify an "exact duplicate".
    pub identity_fields: &'static [F],
    /// Fields matched (case-insensitive substring) by search.
    pub search_fields: &'static [F],
    /// Fields that must be non-empty at the form boundary.
    pub required_fields: &'static [F],
    /// The dot-decimal IP column (special-cased by sort and validation).
    pub ip_field: F,
}

impl<F> RecordDescriptor<F> {
    /// Backend table name.
    pub const fn table(&self) -> &'static str {
        self.kind.table()
    }
}

// ============ Record envelope ============

/// Envelope shared by every record: identity, lifecycle and backend timestamps.
///
/// Never sent on create/update; the backend owns these columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Backend-assigned id.
    pub id: RecordId,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_hidden: bool,
    /// When the record was hidden; set iff `is_hidden`.
    #[serde(default, with = "crate::utils::datetime")]
    pub hidden_at: Option<DateTime<Utc>>,
    /// Insert timestamp.
    #[serde(default, with = "crate::utils::datetime")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp.
    #[serde(default, with = "crate::utils::datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecordMeta {
    /// Envelope for a freshly inserted row.
    pub fn new(id: RecordId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            is_hidden: false,
            hidden_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Writable subset of a record, sent on create and update.
pub trait RecordDraft: Clone + Debug + Default + PartialEq + Serialize + Send + Sync + 'static {
    /// Column enum.
    type Field: RecordField;

    /// Read one column.
    fn field(&self, field: Self::Field) -> FieldValue<'_>;

    /// Human-readable name used in duplicate messages and confirmation dialogs.
    fn display_name(&self) -> String;
}

/// A stored inventory record: [`RecordMeta`] plus its draft fields.
pub trait InventoryRecord:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Column enum.
    type Field: RecordField;
    /// Writable subset.
    type Draft: RecordDraft<Field = Self::Field>;

    /// The static descriptor of this record type.
    fn descriptor() -> &'static RecordDescriptor<Self::Field>;

    /// Build a record from an envelope and its fields.
    fn materialize(meta: RecordMeta, data: Self::Draft) -> Self;

    /// Lifecycle envelope.
    fn meta(&self) -> &RecordMeta;

    /// Mutable lifecycle envelope.
    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Writable fields.
    fn data(&self) -> &Self::Draft;

    /// Mutable writable fields.
    fn data_mut(&mut self) -> &mut Self::Draft;

    fn id(&self) -> RecordId {
        self.meta().id
    }

    fn is_hidden(&self) -> bool {
        self.meta().is_hidden
    }

    fn hidden_at(&self) -> Option<DateTime<Utc>> {
        self.meta().hidden_at
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.meta().created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.meta().updated_at
    }

    fn field(&self, field: Self::Field) -> FieldValue<'_> {
        self.data().field(field)
    }

    fn display_name(&self) -> String {
        self.data().display_name()
    }

    /// Prefill for edit and for "clone as new": every writable field, no id.
    fn to_draft(&self) -> Self::Draft {
        self.data().clone()
    }

    /// Replace the writable fields, stamping `updated_at`.
    fn apply_draft(&mut self, data: Self::Draft, now: DateTime<Utc>) {
        *self.data_mut() = data;
        self.meta_mut().updated_at = Some(now);
    }

    /// Hide or restore, keeping `hidden_at` set iff `is_hidden`.
    fn set_hidden(&mut self, hidden: bool, now: DateTime<Utc>) {
        let meta = self.meta_mut();
        meta.is_hidden = hidden;
        meta.hidden_at = hidden.then_some(now);
    }
}

/// Join a draft's display parts, skipping empty ones.
pub(crate) fn join_display(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .filter_map(|p| p.filter(|s| !s.is_empty()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fold `""` into `None` for optional text form input.
pub(crate) fn opt_text(value: Option<&String>) -> FieldValue<'_> {
    FieldValue::text(value.map(String::as_str))
}
