use crate::docx;
use crate::error::{Error, Result};
use crate::record::DataRecord;
use crate::workbook;
use std::path::Path;

/// The two template formats a request can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Word,
    Excel,
}

impl DocumentKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentKind::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Word => "docx",
            DocumentKind::Excel => "xlsx",
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "docx" => Ok(DocumentKind::Word),
            "xlsx" | "xlsm" => Ok(DocumentKind::Excel),
            _ => Err(Error::UnsupportedFormat(extension)),
        }
    }

    /// Fill `template` with `data`.
    pub fn render(&self, template: &[u8], data: &DataRecord) -> Result<Vec<u8>> {
        match self {
            DocumentKind::Word => docx::fill_docx(template, data),
            DocumentKind::Excel => workbook::fill_xlsx(template, data),
        }
    }
}
