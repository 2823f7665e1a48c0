//! Export shaping: turn the sorted + filtered list into a flat table.
//!
//! Writing the table to a file is left to an [`Exporter`] implementation
//! supplied by the platform layer.

mod rows;

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use stork_inventory_backend::InventoryRecord;

use crate::error::CoreResult;
use crate::utils::html;

/// Missing value placeholder.
pub const EMPTY_CELL: &str = "-";
/// `notes_ii` placeholder in PDF output.
pub const RICH_CONTENT_PLACEHOLDER: &str = "[Rich Content]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    /// Excel workbook
    Spreadsheet,
    Pdf,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Spreadsheet => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    /// CSV and spreadsheet cells hold plain text only.
    pub const fn is_flat(self) -> bool {
        matches!(self, Self::Csv | Self::Spreadsheet)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Fixed table shape of one record type.
#[derive(Debug)]
pub struct ExportLayout {
    /// PDF heading.
    pub title: &'static str,
    /// Worksheet name.
    pub sheet_name: &'static str,
    /// Default file name prefix.
    pub file_stem: &'static str,
    pub flat_headers: &'static [&'static str],
    pub pdf_headers: &'static [&'static str],
}

impl ExportLayout {
    pub fn headers(&self, format: ExportFormat) -> &'static [&'static str] {
        if format.is_flat() {
            self.flat_headers
        } else {
            self.pdf_headers
        }
    }
}

/// A record type that can be rendered as one export row.
pub trait ExportRow: InventoryRecord {
    fn layout() -> &'static ExportLayout;

    /// Cells in header order; timestamps rendered in `tz`.
    fn cells<Tz>(&self, format: ExportFormat, tz: &Tz) -> Vec<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display;
}

/// Rendered table handed to an [`Exporter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTable {
    pub title: String,
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// File-writing seam.
pub trait Exporter: Send + Sync {
    fn supports(&self, format: ExportFormat) -> bool;

    /// Write `table` as `{filename}.{ext}`; returns the written path.
    fn export(&self, table: &ExportTable, filename: &str, format: ExportFormat)
    -> CoreResult<PathBuf>;
}

/// Build the export table in local time. Input order is kept; nothing is
/// mutated.
pub fn build_export_table<'a, R, I>(records: I, format: ExportFormat) -> ExportTable
where
    R: ExportRow + 'a,
    I: IntoIterator<Item = &'a R>,
{
    build_export_table_in(records, format, &Local)
}

pub fn build_export_table_in<'a, R, I, Tz>(records: I, format: ExportFormat, tz: &Tz) -> ExportTable
where
    R: ExportRow + 'a,
    I: IntoIterator<Item = &'a R>,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let layout = R::layout();
    ExportTable {
        title: layout.title.to_string(),
        sheet_name: layout.sheet_name.to_string(),
        headers: layout
            .headers(format)
            .iter()
            .map(ToString::to_string)
            .collect(),
        rows: records.into_iter().map(|r| r.cells(format, tz)).collect(),
    }
}

/// `{file_stem}_YYYYMMDD_HHMM`
pub fn default_filename<R: ExportRow, Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("{}_{}", R::layout().file_stem, now.format("%Y%m%d_%H%M"))
}

/// `YYYY/M/D`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%-m/%-d").to_string()
}

/// `YYYY/M/D HH:MM:SS` in `tz`.
pub fn format_timestamp<Tz>(ts: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    ts.with_timezone(tz).format("%Y/%-m/%-d %H:%M:%S").to_string()
}

fn text_cell(value: Option<&String>) -> String {
    value
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(|| EMPTY_CELL.to_string(), ToString::to_string)
}

fn date_cell(value: Option<NaiveDate>) -> String {
    value.map_or_else(|| EMPTY_CELL.to_string(), format_date)
}

fn timestamp_cell<Tz>(value: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    value.map_or_else(|| EMPTY_CELL.to_string(), |ts| format_timestamp(ts, tz))
}

fn rich_cell(value: Option<&String>, format: ExportFormat) -> String {
    match value.filter(|s| !s.is_empty()) {
        None => EMPTY_CELL.to_string(),
        Some(_) if !format.is_flat() => RICH_CONTENT_PLACEHOLDER.to_string(),
        Some(html) => {
            let text = html::decode_entities(&html::strip_tags(html));
            if text.trim().is_empty() {
                EMPTY_CELL.to_string()
            } else {
                text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use stork_inventory_backend::{PcRecord, PrinterRecord};

    use super::*;
    use crate::test_utils::{network, pc, printer};

    fn updated(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(y, m, d, 8, 5, 9).single()
    }

    #[test]
    fn date_formats_drop_leading_zeros() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap_or_default();
        assert_eq!(format_date(d), "2024/3/5");
        let ts = updated(2024, 3, 5).unwrap_or_default();
        assert_eq!(format_timestamp(ts, &Utc), "2024/3/5 08:05:09");
    }

    #[test]
    fn printer_flat_row() {
        let mut p = printer(1, "HP", "M404", Some("10.0.0.9"));
        p.data.toner_replaced_at = NaiveDate::from_ymd_opt(2024, 11, 2);
        p.data.notes_ii = Some("<p>換過 <b>滾筒</b> &amp; 紙匣</p>".to_string());
        p.meta.updated_at = updated(2024, 11, 3);

        let table = build_export_table_in([&p], ExportFormat::Csv, &Utc);
        assert_eq!(table.sheet_name, "Printers");
        assert_eq!(table.headers[0], "廠牌");
        assert_eq!(
            table.rows[0],
            vec![
                "HP",
                "M404",
                "-",
                "10.0.0.9",
                "2024/11/2",
                "-",
                "換過 滾筒 & 紙匣",
                "2024/11/3 08:05:09"
            ]
        );
    }

    #[test]
    fn pdf_uses_placeholder_for_rich_notes() {
        let mut p = printer(1, "HP", "M404", None);
        p.data.notes_ii = Some("<img src=\"data:image/png;base64,AAAA\" />".to_string());
        let table = build_export_table_in([&p], ExportFormat::Pdf, &Utc);
        assert_eq!(table.title, "Printer Information Export");
        assert_eq!(table.headers[4], "Toner Date");
        assert_eq!(table.rows[0][6], RICH_CONTENT_PLACEHOLDER);
    }

    #[test]
    fn image_only_notes_flatten_to_dash() {
        let mut p = printer(1, "HP", "M404", None);
        p.data.notes_ii = Some("<img src=\"data:image/png;base64,AAAA\" />".to_string());
        let table = build_export_table_in([&p], ExportFormat::Spreadsheet, &Utc);
        assert_eq!(table.rows[0][6], EMPTY_CELL);
    }

    #[test]
    fn pc_cpu_ram_and_os_columns() {
        let mut p = pc(1, "PC-1", "i5-12400", Some("10.0.0.5"));
        p.data.set_core_counts(&[6], &[12]);
        p.data.ram_gb = Some(15.5);
        p.data.os_name = Some("Windows 11".to_string());
        p.data.os_version = Some("23H2".to_string());

        let flat = build_export_table_in([&p], ExportFormat::Csv, &Utc);
        assert_eq!(flat.rows[0][1], "i5-12400 (6核/12緒)");
        assert_eq!(flat.rows[0][2], "15.5 GB");
        assert_eq!(flat.rows[0][4], "Windows 11 23H2");

        let pdf = build_export_table_in([&p], ExportFormat::Pdf, &Utc);
        assert_eq!(pdf.rows[0][1], "i5-12400\n(6核/12緒)");
        assert_eq!(pdf.rows[0][4], "Windows 11\n23H2");
        assert_eq!(pdf.title, "PC Information Export");
    }

    #[test]
    fn pc_without_details_renders_dashes() {
        let p = pc(1, "PC-1", "i5", None);
        let row = &build_export_table_in([&p], ExportFormat::Csv, &Utc).rows[0];
        assert_eq!(row[1], "i5");
        assert_eq!(row[2], "-");
        assert_eq!(row[4], "-");
        assert_eq!(row[5], "-");
    }

    #[test]
    fn network_row_has_location_and_purchase_date() {
        let mut n = network(1, "Cisco", "C9200", Some("10.0.1.1"));
        n.data.location = Some("3F 機房".to_string());
        n.data.purchase_date = NaiveDate::from_ymd_opt(2023, 7, 1);
        let table = build_export_table_in([&n], ExportFormat::Csv, &Utc);
        assert_eq!(table.sheet_name, "Network Equipment");
        assert_eq!(table.rows[0][4], "3F 機房");
        assert_eq!(table.rows[0][5], "2023/7/1");
        assert_eq!(table.rows[0].len(), table.headers.len());
    }

    #[test]
    fn keeps_input_order() {
        let list = vec![
            printer(5, "HP", "A", None),
            printer(2, "Canon", "B", None),
        ];
        let table = build_export_table_in(&list, ExportFormat::Csv, &Utc);
        let brands: Vec<_> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(brands, vec!["HP", "Canon"]);
    }

    #[test]
    fn default_filenames() {
        let now = Utc.with_ymd_and_hms(2026, 1, 9, 14, 3, 0).single().unwrap_or_default();
        assert_eq!(
            default_filename::<PrinterRecord, _>(&now),
            "printers_export_20260109_1403"
        );
        assert_eq!(
            default_filename::<PcRecord, _>(&now),
            "pc_info_export_20260109_1403"
        );
    }
}
