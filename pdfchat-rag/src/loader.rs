//! Document loading from source files.

use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{RagError, Result};

/// A source of raw document text.
///
/// Format-specific parsing lives behind this trait; the pipeline only sees
/// extracted text.
pub trait DocumentLoader: Send + Sync {
    /// Load and extract the text of the file at `source`.
    fn load(&self, source: &Path) -> Result<Document>;
}

/// Loads PDF files from a configured data directory.
///
/// Relative paths are resolved under the data directory; any extension
/// other than `.pdf` is rejected before the file is read.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    data_dir: PathBuf,
}

impl PdfLoader {
    /// Create a loader resolving files under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, source: &Path) -> Result<Document> {
        let path = if source.is_absolute() {
            source.to_path_buf()
        } else {
            self.data_dir.join(source)
        };

        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(RagError::UnsupportedFormat { path });
        }

        let text = pdf_extract::extract_text(&path).map_err(|e| RagError::DocumentLoad {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(Document { source_path: Some(path), text })
    }
}
