//! PDF reading and loading operations.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerger::io::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("document.pdf"))?;
//! println!("Loaded {} pages in {:?}", loaded.page_count, loaded.load_time);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PdfMergeError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }
}

/// Loads PDF documents from disk with `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the path does not exist or is not a regular file
    /// - the file is not a valid PDF
    /// - the PDF is encrypted
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        Self::check_path_exists(path)?;

        let path_buf = path.to_path_buf();
        let start = Instant::now();

        let doc = Document::load(&path_buf).map_err(|e| {
            let err_msg = e.to_string();
            let lowered = err_msg.to_lowercase();
            if lowered.contains("encrypt") || lowered.contains("password") {
                PdfMergeError::encrypted_pdf(path_buf.clone())
            } else {
                PdfMergeError::failed_to_load_pdf(path_buf.clone(), err_msg)
            }
        })?;

        let loaded = LoadedPdf::new(doc, path_buf, start.elapsed());
        tracing::debug!(
            path = %loaded.path.display(),
            pages = loaded.page_count,
            elapsed = ?loaded.load_time,
            "loaded pdf"
        );

        Ok(loaded)
    }

    /// Check that `path` names an existing regular file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::FileNotFound`], [`PdfMergeError::NotAFile`] or
    /// [`PdfMergeError::FileNotAccessible`].
    pub fn check_path_exists(path: &Path) -> Result<()> {
        let exists = path
            .try_exists()
            .map_err(|source| PdfMergeError::FileNotAccessible {
                path: path.to_path_buf(),
                source,
            })?;

        if !exists {
            return Err(PdfMergeError::file_not_found(path.to_path_buf()));
        }

        if !path.is_file() {
            return Err(PdfMergeError::not_a_file(path.to_path_buf()));
        }

        Ok(())
    }
}
