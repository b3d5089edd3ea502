//! Page inspector.
//!
//! Checks a PDF before it is admitted to the file list: the file must exist,
//! parse, and not be encrypted. The check reports the page count plus a few
//! details shown next to the entry.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerger::inspect::PageInspector;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let info = PageInspector::new().inspect(Path::new("report.pdf"))?;
//! println!("{} has {} pages", info.path.display(), info.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::{Document, Object};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io::PdfReader;

/// What the inspector learned about one PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfInfo {
    /// Path to the inspected file.
    pub path: PathBuf,

    /// Number of pages in the PDF.
    pub page_count: usize,

    /// PDF header version, e.g. `"1.7"`.
    pub version: String,

    /// Size of the file in bytes.
    pub file_size: u64,

    /// Number of indirect objects.
    pub object_count: usize,

    /// First page dimensions (width, height) in points, if available.
    pub page_dimensions: Option<(f32, f32)>,
}

impl PdfInfo {
    fn from_document(path: PathBuf, doc: &Document, file_size: u64) -> Self {
        Self {
            path,
            page_count: doc.get_pages().len(),
            version: doc.version.clone(),
            file_size,
            object_count: doc.objects.len(),
            page_dimensions: first_page_dimensions(doc),
        }
    }
}

/// Counts pages and gathers display details with `lopdf`.
#[derive(Debug, Clone, Default)]
pub struct PageInspector {
    reader: PdfReader,
}

impl PageInspector {
    /// Create a new inspector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns an open error (see [`crate::ErrorKind::Open`]) if the file is
    /// missing, is not a regular file, cannot be parsed, or is encrypted.
    pub fn inspect(&self, path: &Path) -> Result<PdfInfo> {
        let loaded = self.reader.load(path)?;
        Ok(PdfInfo::from_document(
            loaded.path,
            &loaded.document,
            loaded.file_size,
        ))
    }

    /// Only the page count of the PDF at `path`.
    pub fn page_count(&self, path: &Path) -> Result<usize> {
        Ok(self.inspect(path)?.page_count)
    }
}

fn first_page_dimensions(doc: &Document) -> Option<(f32, f32)> {
    let (_, page_id) = doc.get_pages().into_iter().next()?;
    let page = doc.get_object(page_id).and_then(Object::as_dict).ok()?;
    let media_box = page.get(b"MediaBox").and_then(Object::as_array).ok()?;
    if media_box.len() < 4 {
        return None;
    }
    let width = media_box[2].as_float().ok()? - media_box[0].as_float().ok()?;
    let height = media_box[3].as_float().ok()? - media_box[1].as_float().ok()?;
    Some((width, height))
}

/// Parse a `"major.minor"` PDF version.
pub fn parse_version(version: &str) -> Option<(u8, u8)> {
    let (major, minor) = version.trim().split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}
