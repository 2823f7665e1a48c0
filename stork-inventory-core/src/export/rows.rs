//! Per-record export rows.

use std::fmt;

use chrono::TimeZone;
use stork_inventory_backend::{NetworkRecord, PcRecord, PrinterRecord};

use super::{
    EMPTY_CELL, ExportFormat, ExportLayout, ExportRow, date_cell, rich_cell, text_cell,
    timestamp_cell,
};

static PRINTER_LAYOUT: ExportLayout = ExportLayout {
    title: "Printer Information Export",
    sheet_name: "Printers",
    file_stem: "printers_export",
    flat_headers: &[
        "廠牌",
        "型號",
        "財編",
        "IP 地址",
        "碳粉更換日期",
        "備註",
        "備註 II",
        "異動日期",
    ],
    pdf_headers: &[
        "Brand",
        "Model",
        "Asset ID",
        "IP Address",
        "Toner Date",
        "Notes",
        "Notes II",
        "異動日期",
    ],
};

static NETWORK_LAYOUT: ExportLayout = ExportLayout {
    title: "Network Equipment Export",
    sheet_name: "Network Equipment",
    file_stem: "network_export",
    flat_headers: &[
        "廠牌",
        "型號",
        "財編",
        "IP 地址",
        "位置",
        "購買日期",
        "備註",
        "備註 II",
        "異動日期",
    ],
    pdf_headers: &[
        "Brand",
        "Model",
        "Asset ID",
        "IP Address",
        "Location",
        "Purchase Date",
        "Notes",
        "Notes II",
        "異動日期",
    ],
};

const PC_HEADERS: &[&str] = &[
    "電腦名稱",
    "CPU",
    "記憶體",
    "硬碟資訊",
    "作業系統",
    "IP 地址",
    "異動日期",
];

static PC_LAYOUT: ExportLayout = ExportLayout {
    title: "PC Information Export",
    sheet_name: "PC Info",
    file_stem: "pc_info_export",
    flat_headers: PC_HEADERS,
    pdf_headers: PC_HEADERS,
};

impl ExportRow for PrinterRecord {
    fn layout() -> &'static ExportLayout {
        &PRINTER_LAYOUT
    }

    fn cells<Tz>(&self, format: ExportFormat, tz: &Tz) -> Vec<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let d = &self.data;
        vec![
            text_cell(d.brand.as_ref()),
            text_cell(d.model.as_ref()),
            text_cell(d.asset_id.as_ref()),
            text_cell(d.ip_address.as_ref()),
            date_cell(d.toner_replaced_at),
            text_cell(d.notes.as_ref()),
            rich_cell(d.notes_ii.as_ref(), format),
            timestamp_cell(self.meta.updated_at, tz),
        ]
    }
}

impl ExportRow for NetworkRecord {
    fn layout() -> &'static ExportLayout {
        &NETWORK_LAYOUT
    }

    fn cells<Tz>(&self, format: ExportFormat, tz: &Tz) -> Vec<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let d = &self.data;
        vec![
            text_cell(d.brand.as_ref()),
            text_cell(d.model.as_ref()),
            text_cell(d.asset_id.as_ref()),
            text_cell(d.ip_address.as_ref()),
            text_cell(d.location.as_ref()),
            date_cell(d.purchase_date),
            text_cell(d.notes.as_ref()),
            rich_cell(d.notes_ii.as_ref(), format),
            timestamp_cell(self.meta.updated_at, tz),
        ]
    }
}

impl ExportRow for PcRecord {
    fn layout() -> &'static ExportLayout {
        &PC_LAYOUT
    }

    fn cells<Tz>(&self, format: ExportFormat, tz: &Tz) -> Vec<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let d = &self.data;
        // PDF 单元格内换行，平面格式用空格
        let sep = if format.is_flat() { " " } else { "\n" };

        let cpu = match non_empty(d.cpu_name.as_ref()) {
            None => EMPTY_CELL.to_string(),
            Some(cpu) => match non_empty(d.cores.as_ref()) {
                None => cpu.to_string(),
                Some(cores) => {
                    let logical = non_empty(d.logical_processors.as_ref()).unwrap_or(EMPTY_CELL);
                    format!("{cpu}{sep}({cores}核/{logical}緒)")
                }
            },
        };

        let ram = d
            .ram_gb
            .filter(|gb| *gb > 0.0)
            .map_or_else(|| EMPTY_CELL.to_string(), |gb| format!("{gb} GB"));

        let os = match non_empty(d.os_name.as_ref()) {
            None => EMPTY_CELL.to_string(),
            Some(name) => match non_empty(d.os_version.as_ref()) {
                None => name.to_string(),
                Some(version) => format!("{name}{sep}{version}"),
            },
        };

        vec![
            text_cell(d.computer_name.as_ref()),
            cpu,
            ram,
            text_cell(d.hdd_info.as_ref()),
            os,
            text_cell(d.ip_address.as_ref()),
            timestamp_cell(self.meta.updated_at, tz),
        ]
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}
