//! pdfmerger - Combine PDF files into a single document.
//!
//! This library holds everything behind the desktop merger except the window:
//!
//! - Page inspection of candidate files
//! - First-page thumbnails through PDFium
//! - An ordered file list with selection and reordering
//! - Page-order preserving merge with atomic output
//! - Comprehensive error handling
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use pdfmerger::config::Config;
//! use pdfmerger::merge;
//! use pdfmerger::session::Session;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! let report = session.add_paths(["a.pdf", "b.pdf"]);
//! for failure in &report.failures {
//!     eprintln!("skipped: {}", failure.error);
//! }
//!
//! let plan = session.merge_plan()?;
//! let report = merge::merge_to_file(&plan, &Config::default(), |progress| {
//!     println!("Merging file {}/{}...", progress.index, progress.total);
//! })?;
//! println!("Created {} page document", report.total_pages);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfmerger::inspect::PageInspector;
//! use pdfmerger::io::{PdfReader, PdfWriter};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let info = PageInspector::new().inspect(Path::new("input.pdf"))?;
//! println!("PDF has {} pages", info.page_count);
//!
//! let mut loaded = PdfReader::new().load(Path::new("input.pdf"))?;
//! PdfWriter::new().save(&mut loaded.document, Path::new("output.pdf"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod inspect;
pub mod io;
pub mod merge;
pub mod session;
pub mod thumbnail;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorKind, PdfMergeError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
