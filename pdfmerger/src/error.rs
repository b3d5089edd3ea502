//! Error types for pdfmerger.
//!
//! Every fallible operation in the library returns [`PdfMergeError`]. The
//! front end only needs to know which of the three user-visible categories
//! an error belongs to, see [`PdfMergeError::kind`].
//!
//! # Error Categories
//!
//! - **Open errors**: a file could not be found, read or parsed as a PDF.
//!   The file is skipped and the rest of the batch continues.
//! - **Merge errors**: the merge or the output write failed. The whole merge
//!   is aborted.
//! - **Preconditions**: there is nothing to merge or nowhere to write to.
//!   These are warnings, no PDF work was attempted.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfmerger operations.
pub type Result<T> = std::result::Result<T, PdfMergeError>;

/// User-visible category of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A single input could not be opened or parsed.
    Open,
    /// The merge or the output write failed.
    Merge,
    /// The request was rejected before any PDF work started.
    Precondition,
}

/// Main error type for pdfmerger operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfMergeError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file exists but cannot be accessed.
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Path points at something other than a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// The PDF parser rejected the file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", .path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// PDF is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        .path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// PDF parsed but its structure is unusable.
    #[error("Corrupted or invalid PDF: {}\n  Details: {details}", .path.display())]
    CorruptedPdf {
        /// Path to the corrupted PDF.
        path: PathBuf,
        /// Details about the corruption.
        details: String,
    },

    /// The file list was empty when a merge was requested.
    #[error("No PDF files to merge")]
    NoFilesToMerge,

    /// The output path was empty when a merge was requested.
    #[error("No output file path specified")]
    NoOutputPath,

    /// The output file (or its temporary sibling) could not be created.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing or finalizing the output file failed.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Page tree manipulation failed while merging.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// First-page rendering failed.
    #[error("Failed to render preview for {}: {reason}", .path.display())]
    ThumbnailFailed {
        /// Path of the document.
        path: PathBuf,
        /// Backend message.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfMergeError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl PdfMergeError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(path: PathBuf, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            path,
            details: details.into(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create a ThumbnailFailed error.
    pub fn thumbnail_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::ThumbnailFailed {
            path,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classify the error for presentation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound { .. }
            | Self::FileNotAccessible { .. }
            | Self::NotAFile { .. }
            | Self::FailedToLoadPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::CorruptedPdf { .. }
            | Self::ThumbnailFailed { .. } => ErrorKind::Open,
            Self::NoFilesToMerge | Self::NoOutputPath | Self::InvalidConfig { .. } => {
                ErrorKind::Precondition
            }
            Self::FailedToCreateOutput { .. }
            | Self::FailedToWrite { .. }
            | Self::MergeFailed { .. }
            | Self::Io { .. }
            | Self::Other { .. } => ErrorKind::Merge,
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::ThumbnailFailed { .. } => 3,
            Self::NoFilesToMerge => 1,
            Self::NoOutputPath => 1,
            Self::InvalidConfig { .. } => 1,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::MergeFailed { .. } => 6,
            Self::Other { .. } => 1,
        }
    }
}
