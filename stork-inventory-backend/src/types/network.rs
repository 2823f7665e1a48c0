use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{
    FieldValue, InventoryRecord, RecordDescriptor, RecordDraft, RecordField, RecordKind,
    RecordMeta, join_display, opt_text,
};

/// Columns of the `network_equipment` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkField {
    Brand,
    Model,
    AssetId,
    IpAddress,
    Location,
    PurchaseDate,
    Notes,
    NotesIi,
}

impl RecordField for NetworkField {
    fn name(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Model => "model",
            Self::AssetId => "asset_id",
            Self::IpAddress => "ip_address",
            Self::Location => "location",
            Self::PurchaseDate => "purchase_date",
            Self::Notes => "notes",
            Self::NotesIi => "notes_ii",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Brand,
            Self::Model,
            Self::AssetId,
            Self::IpAddress,
            Self::Location,
            Self::PurchaseDate,
            Self::Notes,
            Self::NotesIi,
        ]
    }
}

/// Network equipment type descriptor.
pub static NETWORK_DESCRIPTOR: RecordDescriptor<NetworkField> = RecordDescriptor {
    kind: RecordKind::Network,
    identity_fields: &[
        NetworkField::Brand,
        NetworkField::Model,
        NetworkField::IpAddress,
        NetworkField::AssetId,
        NetworkField::Location,
    ],
    search_fields: &[
        NetworkField::Brand,
        NetworkField::Model,
        NetworkField::IpAddress,
        NetworkField::Location,
        NetworkField::Notes,
        NetworkField::NotesIi,
        NetworkField::AssetId,
    ],
    required_fields: &[NetworkField::Brand, NetworkField::Model],
    ip_field: NetworkField::IpAddress,
};

/// Writable columns of a network equipment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDraft {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub asset_id: Option<String>,
    pub ip_address: Option<String>,
    /// Rack / closet / floor.
    pub location: Option<String>,
    #[serde(with = "crate::utils::datetime::date")]
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub notes_ii: Option<String>,
}

impl RecordDraft for NetworkDraft {
    type Field = NetworkField;

    fn field(&self, field: NetworkField) -> FieldValue<'_> {
        match field {
            NetworkField::Brand => opt_text(self.brand.as_ref()),
            NetworkField::Model => opt_text(self.model.as_ref()),
            NetworkField::AssetId => opt_text(self.asset_id.as_ref()),
            NetworkField::IpAddress => opt_text(self.ip_address.as_ref()),
            NetworkField::Location => opt_text(self.location.as_ref()),
            NetworkField::PurchaseDate => FieldValue::Date(self.purchase_date),
            NetworkField::Notes => opt_text(self.notes.as_ref()),
            NetworkField::NotesIi => opt_text(self.notes_ii.as_ref()),
        }
    }

    fn display_name(&self) -> String {
        join_display(&[self.brand.as_deref(), self.model.as_deref()])
    }
}

/// A row of the `network_equipment` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(flatten)]
    pub data: NetworkDraft,
}

impl InventoryRecord for NetworkRecord {
    type Field = NetworkField;
    type Draft = NetworkDraft;

    fn descriptor() -> &'static RecordDescriptor<NetworkField> {
        &NETWORK_DESCRIPTOR
    }

    fn materialize(meta: RecordMeta, data: NetworkDraft) -> Self {
        Self { meta, data }
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn data(&self) -> &NetworkDraft {
        &self.data
    }

    fn data_mut(&mut self) -> &mut NetworkDraft {
        &mut self.data
    }
}
