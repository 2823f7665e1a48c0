use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{
    FieldValue, InventoryRecord, RecordDescriptor, RecordDraft, RecordField, RecordKind,
    RecordMeta, join_display, opt_text,
};

/// Columns of the `printers` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterField {
    Brand,
    Model,
    AssetId,
    IpAddress,
    TonerReplacedAt,
    Notes,
    NotesIi,
}

impl RecordField for PrinterField {
    fn name(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Model => "model",
            Self::AssetId => "asset_id",
            Self::IpAddress => "ip_address",
            Self::TonerReplacedAt => "toner_replaced_at",
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
            Self::TonerReplacedAt,
            Self::Notes,
            Self::NotesIi,
        ]
    }
}

/// Printer type descriptor.
pub static PRINTER_DESCRIPTOR: RecordDescriptor<PrinterField> = RecordDescriptor {
    kind: RecordKind::Printer,
    identity_fields: &[
        PrinterField::Brand,
        PrinterField::Model,
        PrinterField::IpAddress,
        PrinterField::AssetId,
    ],
    search_fields: &[
        PrinterField::Brand,
        PrinterField::Model,
        PrinterField::IpAddress,
        PrinterField::Notes,
        PrinterField::NotesIi,
        PrinterField::AssetId,
    ],
    required_fields: &[PrinterField::Brand, PrinterField::Model],
    ip_field: PrinterField::IpAddress,
};

/// Writable columns of a printer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterDraft {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub asset_id: Option<String>,
    pub ip_address: Option<String>,
    /// 碳粉更换日期
    #[serde(with = "crate::utils::datetime::date")]
    pub toner_replaced_at: Option<NaiveDate>,
    pub notes: Option<String>,
    pub notes_ii: Option<String>,
}

impl RecordDraft for PrinterDraft {
    type Field = PrinterField;

    fn field(&self, field: PrinterField) -> FieldValue<'_> {
        match field {
            PrinterField::Brand => opt_text(self.brand.as_ref()),
            PrinterField::Model => opt_text(self.model.as_ref()),
            PrinterField::AssetId => opt_text(self.asset_id.as_ref()),
            PrinterField::IpAddress => opt_text(self.ip_address.as_ref()),
            PrinterField::TonerReplacedAt => FieldValue::Date(self.toner_replaced_at),
            PrinterField::Notes => opt_text(self.notes.as_ref()),
            PrinterField::NotesIi => opt_text(self.notes_ii.as_ref()),
        }
    }

    fn display_name(&self) -> String {
        join_display(&[self.brand.as_deref(), self.model.as_deref()])
    }
}

/// A row of the `printers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(flatten)]
    pub data: PrinterDraft,
}

impl InventoryRecord for PrinterRecord {
    type Field = PrinterField;
    type Draft = PrinterDraft;

    fn descriptor() -> &'static RecordDescriptor<PrinterField> {
        &PRINTER_DESCRIPTOR
    }

    fn materialize(meta: RecordMeta, data: PrinterDraft) -> Self {
        Self { meta, data }
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn data(&self) -> &PrinterDraft {
        &self.data
    }

    fn data_mut(&mut self) -> &mut PrinterDraft {
        &mut self.data
    }
}
