//! PDF writing and saving operations.
//!
//! Writes are atomic by default: the document is serialized into a hidden
//! sibling of the target (`.name.pdf.partial`) which is renamed over the
//! target once everything is flushed. Any failure removes the temporary
//! file, so a failed save never leaves a truncated PDF behind and never
//! clobbers a file that already existed at the target path.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerger::io::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let stats = PdfWriter::new().save(&mut doc, Path::new("output.pdf"))?;
//! println!("Wrote {} bytes", stats.file_size);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{PdfMergeError, Result};

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 64 * 1024,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Save a PDF document to `path`, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the output (or temporary) file cannot be created
    /// - serialization or flushing fails
    /// - the final rename fails
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| {
                PdfMergeError::FailedToCreateOutput {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }

        let write_path = if self.options.atomic {
            temp_path_for(path)
        } else {
            path.to_path_buf()
        };

        let result = self.write_to(doc, &write_path).and_then(|()| {
            if self.options.atomic {
                std::fs::rename(&write_path, path).map_err(|source| {
                    PdfMergeError::FailedToWrite {
                        path: path.to_path_buf(),
                        source,
                    }
                })
            } else {
                Ok(())
            }
        });

        if let Err(err) = result {
            if self.options.atomic && write_path.exists() {
                if let Err(cleanup) = std::fs::remove_file(&write_path) {
                    tracing::warn!(
                        path = %write_path.display(),
                        error = %cleanup,
                        "failed to remove temporary output"
                    );
                }
            }
            return Err(err);
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let stats = WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
        };
        tracing::info!(
            path = %path.display(),
            bytes = stats.file_size,
            elapsed = ?stats.write_time,
            "wrote pdf"
        );

        Ok(stats)
    }

    fn write_to(&self, doc: &mut Document, write_path: &Path) -> Result<()> {
        let file = File::create(write_path).map_err(|source| {
            PdfMergeError::FailedToCreateOutput {
                path: write_path.to_path_buf(),
                source,
            }
        })?;

        let mut writer = BufWriter::with_capacity(self.options.buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| PdfMergeError::FailedToWrite {
                path: write_path.to_path_buf(),
                source: std::io::Error::other(e),
            })?;

        writer.flush().map_err(|source| PdfMergeError::FailedToWrite {
            path: write_path.to_path_buf(),
            source,
        })?;

        writer
            .get_ref()
            .sync_all()
            .map_err(|source| PdfMergeError::FailedToWrite {
                path: write_path.to_path_buf(),
                source,
            })
    }
}

/// Hidden sibling used while an atomic write is in progress.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| "output.pdf".as_ref()));
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_pdf;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for(Path::new("/tmp/out/merged.pdf")),
            PathBuf::from("/tmp/out/.merged.pdf.partial")
        );
        assert_eq!(
            temp_path_for(Path::new("merged.pdf")),
            PathBuf::from(".merged.pdf.partial")
        );
    }

    #[test]
    fn test_save_atomic_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input.pdf");
        let output = temp_dir.path().join("nested").join("output.pdf");
        create_test_pdf(&input, 2, 1).unwrap();

        let mut doc = Document::load(&input).unwrap();
        let stats = PdfWriter::new().save(&mut doc, &output).unwrap();

        assert!(output.exists());
        assert!(!temp_path_for(&output).exists());
        assert_eq!(stats.output_path, output);
        assert!(stats.file_size > 0);
        assert_eq!(Document::load(&output).unwrap().get_pages().len(), 2);
    }

    #[test]
    fn test_save_non_atomic() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input.pdf");
        let output = temp_dir.path().join("output.pdf");
        create_test_pdf(&input, 1, 1).unwrap();

        let mut doc = Document::load(&input).unwrap();
        let writer = PdfWriter::with_options(WriteOptions {
            atomic: false,
            ..WriteOptions::default()
        });
        writer.save(&mut doc, &output).unwrap();

        assert!(output.exists());
    }

    #[test]
    fn test_failed_rename_keeps_existing_output_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input.pdf");
        create_test_pdf(&input, 1, 1).unwrap();

        // A non-empty directory at the target makes the final rename fail.
        let output = temp_dir.path().join("taken.pdf");
        std::fs::create_dir(&output).unwrap();
        std::fs::write(output.join("keep.txt"), b"keep").unwrap();

        let mut doc = Document::load(&input).unwrap();
        let result = PdfWriter::new().save(&mut doc, &output);

        assert!(matches!(result, Err(PdfMergeError::FailedToWrite { .. })));
        assert!(!temp_path_for(&output).exists());
        assert!(output.join("keep.txt").exists());
    }
}
