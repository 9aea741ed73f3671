use std::path::{Path, PathBuf};

use crate::export::Sheet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Spreadsheet encoding failed: {0}")]
    Encode(String),
}

pub trait SpreadsheetExporter: Send + Sync {
    fn export(&self, sheet: &Sheet, path: &Path) -> Result<ExportSummary, ExportError>;
}
