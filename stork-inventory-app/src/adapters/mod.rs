//! Platform-agnostic adapters for the core's output seams.

mod csv_exporter;

pub use csv_exporter::CsvExporter;
