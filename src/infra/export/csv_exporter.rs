use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::app::export::Sheet;
use crate::app::ports::{ExportError, ExportSummary, SpreadsheetExporter};

pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// Header row, then one record per sheet row.
    pub fn write_sheet<W: Write>(sheet: &Sheet, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(&sheet.columns)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        for row in &sheet.rows {
            csv_writer
                .write_record(row)
                .map_err(|e| ExportError::Encode(e.to_string()))?;
        }
        csv_writer
            .flush()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        Ok(())
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetExporter for CsvExporter {
    fn export(&self, sheet: &Sheet, path: &Path) -> Result<ExportSummary, ExportError> {
        let file = File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::write_sheet(sheet, file)?;

        info!(path = %path.display(), rows = sheet.row_count(), "exported sheet");
        Ok(ExportSummary {
            path: path.to_path_buf(),
            rows: sheet.row_count(),
        })
    }
}
