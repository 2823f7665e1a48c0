//! CSV file exporter (RFC 4180, UTF-8 with BOM so Excel detects the encoding).

use std::borrow::Cow;
use std::path::PathBuf;

use stork_inventory_core::error::{CoreError, CoreResult};
use stork_inventory_core::export::{ExportFormat, ExportTable, Exporter};

const BOM: &str = "\u{feff}";

/// Writes `{dir}/{filename}.csv`.
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full file content, BOM included.
    pub fn render(table: &ExportTable) -> String {
        let mut out = String::from(BOM);
        push_line(&mut out, table.headers.iter().map(String::as_str));
        for row in &table.rows {
            push_line(&mut out, row.iter().map(String::as_str));
        }
        out
    }
}

impl Exporter for CsvExporter {
    fn supports(&self, format: ExportFormat) -> bool {
        format == ExportFormat::Csv
    }

    fn export(
        &self,
        table: &ExportTable,
        filename: &str,
        format: ExportFormat,
    ) -> CoreResult<PathBuf> {
        if !self.supports(format) {
            return Err(CoreError::Export(format!(
                "{format} is not supported by the CSV exporter"
            )));
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CoreError::Export(format!("Failed to create {}: {e}", self.dir.display()))
        })?;
        let path = self
            .dir
            .join(format!("{}.{}", sanitize_filename(filename), format.extension()));
        std::fs::write(&path, Self::render(table))
            .map_err(|e| CoreError::Export(format!("Failed to write {}: {e}", path.display())))?;
        log::debug!("Wrote {} rows to {}", table.rows.len(), path.display());
        Ok(path)
    }
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote(field));
    }
    out.push_str("\r\n");
}

fn quote(field: &str) -> Cow<'_, str> {
    let needs_quotes = field.contains([',', '"', '\n', '\r'])
        || field.starts_with(' ')
        || field.ends_with(' ');
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Keep the name inside the export dir.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "export".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ExportTable {
        ExportTable {
            title: "Printer Information Export".into(),
            sheet_name: "Printers".into(),
            headers: vec!["廠牌".into(), "備註".into()],
            rows: vec![
                vec!["HP".into(), "a, b".into()],
                vec!["Canon".into(), "say \"hi\"\nbye".into()],
            ],
        }
    }

    #[test]
    fn renders_with_bom_and_quoting() {
        let csv = CsvExporter::render(&table());
        assert_eq!(
            csv,
            "\u{feff}廠牌,備註\r\nHP,\"a, b\"\r\nCanon,\"say \"\"hi\"\"\nbye\"\r\n"
        );
    }

    #[test]
    fn writes_file_under_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path().join("exports"));
        let path = exporter
            .export(&table(), "../printers_export", ExportFormat::Csv)
            .unwrap();
        assert_eq!(path, dir.path().join("exports").join("_printers_export.csv"));
        assert!(std::fs::read_to_string(path).unwrap().starts_with('\u{feff}'));
    }

    #[test]
    fn other_formats_are_refused() {
        let exporter = CsvExporter::new(".");
        assert!(!exporter.supports(ExportFormat::Pdf));
        assert!(matches!(
            exporter.export(&table(), "x", ExportFormat::Spreadsheet),
            Err(CoreError::Export(_))
        ));
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
        assert_eq!(sanitize_filename(" .. "), "export");
    }
}
