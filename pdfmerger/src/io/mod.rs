//! I/O operations for pdfmerger.
//!
//! This module handles all file I/O:
//! - Loading PDF documents from disk
//! - Writing merged PDFs to disk atomically

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
