//! Inventory record model.

mod common;
mod network;
mod pc;
mod printer;
mod software;

pub use common::{
    FieldValue, InventoryRecord, RecordDescriptor, RecordDraft, RecordField, RecordId,
    RecordKind, RecordMeta,
};
pub use network::{NETWORK_DESCRIPTOR, NetworkDraft, NetworkField, NetworkRecord};
pub use pc::{PC_DESCRIPTOR, PcDraft, PcField, PcRecord};
pub use printer::{PRINTER_DESCRIPTOR, PrinterDraft, PrinterField, PrinterRecord};
pub use software::{INSTALLED_SOFTWARE_TABLE, InstalledSoftware};
