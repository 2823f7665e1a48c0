use serde::{Deserialize, Serialize};

use super::common::{
    FieldValue, InventoryRecord, RecordDescriptor, RecordDraft, RecordField, RecordKind,
    RecordMeta, join_display, opt_text,
};

/// Columns of the `pcinfo` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PcField {
    ComputerName,
    CpuName,
    Description,
    Notes,
    Custodian,
    AssetId,
    Cores,
    LogicalProcessors,
    OsName,
    OsVersion,
    OsArchitecture,
    OsInstallDate,
    Hostname,
    IpAddress,
    RamGb,
    HddInfo,
    VgaName,
    VgaRamMb,
    Uuid,
    BiosVendor,
    BiosVersion,
    BiosReleaseDate,
    BiosManufactureDate,
    NotesIi,
}

const PC_FIELDS: &[PcField] = &[
    PcField::ComputerName,
    PcField::CpuName,
    PcField::Description,
    PcField::Notes,
    PcField::Custodian,
    PcField::AssetId,
    PcField::Cores,
    PcField::LogicalProcessors,
    PcField::OsName,
    PcField::OsVersion,
    PcField::OsArchitecture,
    PcField::OsInstallDate,
    PcField::Hostname,
    PcField::IpAddress,
    PcField::RamGb,
    PcField::HddInfo,
    PcField::VgaName,
    PcField::VgaRamMb,
    PcField::Uuid,
    PcField::BiosVendor,
    PcField::BiosVersion,
    PcField::BiosReleaseDate,
    PcField::BiosManufactureDate,
    PcField::NotesIi,
];

impl RecordField for PcField {
    fn name(self) -> &'static str {
        match self {
            Self::ComputerName => "computer_name",
            Self::CpuName => "cpu_name",
            Self::Description => "description",
            Self::Notes => "notes",
            Self::Custodian => "custodian",
            Self::AssetId => "asset_id",
            Self::Cores => "cores",
            Self::LogicalProcessors => "logical_processors",
            Self::OsName => "os_name",
            Self::OsVersion => "os_version",
            Self::OsArchitecture => "os_architecture",
            Self::OsInstallDate => "os_install_date",
            Self::Hostname => "hostname",
            Self::IpAddress => "ip_address",
            Self::RamGb => "ram_gb",
            Self::HddInfo => "hdd_info",
            Self::VgaName => "vga_name",
            Self::VgaRamMb => "vga_ram_mb",
            Self::Uuid => "uuid",
            Self::BiosVendor => "bios_vendor",
            Self::BiosVersion => "bios_version",
            Self::BiosReleaseDate => "bios_release_date",
            Self::BiosManufactureDate => "bios_manufacture_date",
            Self::NotesIi => "notes_ii",
        }
    }

    fn all() -> &'static [Self] {
        PC_FIELDS
    }
}

/// PC type descriptor.
pub static PC_DESCRIPTOR: RecordDescriptor<PcField> = RecordDescriptor {
    kind: RecordKind::Pc,
    identity_fields: &[
        PcField::ComputerName,
        PcField::IpAddress,
        PcField::AssetId,
        PcField::Uuid,
    ],
    search_fields: &[
        PcField::ComputerName,
        PcField::CpuName,
        PcField::IpAddress,
        PcField::Uuid,
        PcField::OsName,
        PcField::OsVersion,
        PcField::Notes,
        PcField::Custodian,
        PcField::AssetId,
    ],
    required_fields: &[PcField::ComputerName, PcField::CpuName],
    ip_field: PcField::IpAddress,
};

/// Writable columns of a PC record.
///
/// Most columns are filled by an inventory agent running on the machine;
/// the BIOS/OS dates are kept verbatim as reported (vendor formats vary).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcDraft {
    pub computer_name: Option<String>,
    pub cpu_name: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    /// 保管人
    pub custodian: Option<String>,
    /// 财产编号
    pub asset_id: Option<String>,
    /// Physical cores per socket, comma-joined (`"8,8"` on dual-socket boards).
    pub cores: Option<String>,
    /// Logical processors per socket, comma-joined.
    pub logical_processors: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub os_architecture: Option<String>,
    pub os_install_date: Option<String>,
    pub hostname: Option<String>,
    pub ip_address: Option<String>,
    pub ram_gb: Option<f64>,
    pub hdd_info: Option<String>,
    pub vga_name: Option<String>,
    pub vga_ram_mb: Option<i64>,
    pub uuid: Option<String>,
    pub bios_vendor: Option<String>,
    pub bios_version: Option<String>,
    pub bios_release_date: Option<String>,
    pub bios_manufacture_date: Option<String>,
    /// Rich-text (HTML fragment) notes.
    pub notes_ii: Option<String>,
}

impl PcDraft {
    /// Per-socket physical core counts. Unparsable entries are skipped.
    pub fn core_counts(&self) -> Vec<u32> {
        split_counts(self.cores.as_deref())
    }

    /// Per-socket logical processor counts. Unparsable entries are skipped.
    pub fn logical_processor_counts(&self) -> Vec<u32> {
        split_counts(self.logical_processors.as_deref())
    }

    /// Store per-socket counts in the comma-joined wire form.
    pub fn set_core_counts(&mut self, cores: &[u32], logical: &[u32]) {
        self.cores = join_counts(cores);
        self.logical_processors = join_counts(logical);
    }
}

fn split_counts(value: Option<&str>) -> Vec<u32> {
    value
        .map(|s| {
            s.split(',')
                .filter_map(|part| part.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default()
}

fn join_counts(counts: &[u32]) -> Option<String> {
    if counts.is_empty() {
        None
    } else {
        Some(
            counts
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

impl RecordDraft for PcDraft {
    type Field = PcField;

    #[allow(clippy::cast_precision_loss)]
    fn field(&self, field: PcField) -> FieldValue<'_> {
        match field {
            PcField::ComputerName => opt_text(self.computer_name.as_ref()),
            PcField::CpuName => opt_text(self.cpu_name.as_ref()),
            PcField::Description => opt_text(self.description.as_ref()),
            PcField::Notes => opt_text(self.notes.as_ref()),
            PcField::Custodian => opt_text(self.custodian.as_ref()),
            PcField::AssetId => opt_text(self.asset_id.as_ref()),
            PcField::Cores => opt_text(self.cores.as_ref()),
            PcField::LogicalProcessors => opt_text(self.logical_processors.as_ref()),
            PcField::OsName => opt_text(self.os_name.as_ref()),
            PcField::OsVersion => opt_text(self.os_version.as_ref()),
            PcField::OsArchitecture => opt_text(self.os_architecture.as_ref()),
            PcField::OsInstallDate => opt_text(self.os_install_date.as_ref()),
            PcField::Hostname => opt_text(self.hostname.as_ref()),
            PcField::IpAddress => opt_text(self.ip_address.as_ref()),
            PcField::RamGb => FieldValue::Number(self.ram_gb),
            PcField::HddInfo => opt_text(self.hdd_info.as_ref()),
            PcField::VgaName => opt_text(self.vga_name.as_ref()),
            PcField::VgaRamMb => FieldValue::Number(self.vga_ram_mb.map(|mb| mb as f64)),
            PcField::Uuid => opt_text(self.uuid.as_ref()),
            PcField::BiosVendor => opt_text(self.bios_vendor.as_ref()),
            PcField::BiosVersion => opt_text(self.bios_version.as_ref()),
            PcField::BiosReleaseDate => opt_text(self.bios_release_date.as_ref()),
            PcField::BiosManufactureDate => opt_text(self.bios_manufacture_date.as_ref()),
            PcField::NotesIi => opt_text(self.notes_ii.as_ref()),
        }
    }

    fn display_name(&self) -> String {
        join_display(&[self.computer_name.as_deref()])
    }
}

/// A row of the `pcinfo` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(flatten)]
    pub data: PcDraft,
}

impl InventoryRecord for PcRecord {
    type Field = PcField;
    type Draft = PcDraft;

    fn descriptor() -> &'static RecordDescriptor<PcField> {
        &PC_DESCRIPTOR
    }

    fn materialize(meta: RecordMeta, data: PcDraft) -> Self {
        Self { meta, data }
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn data(&self) -> &PcDraft {
        &self.data
    }

    fn data_mut(&mut self) -> &mut PcDraft {
        &mut self.data
    }
}
