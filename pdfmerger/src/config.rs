//! Configuration for pdfmerger.
//!
//! A [`Config`] carries everything the library needs beyond the file list
//! itself: where the merged document goes, how it is written, and how
//! previews are rendered. Front ends build one from their own inputs
//! (command line, widgets) and call [`Config::validate`] before use.

use std::{path::PathBuf, str::FromStr};

use crate::error::{PdfMergeError, Result};

/// Output file name used when the user has not chosen one.
pub const DEFAULT_OUTPUT_FILE: &str = "merged.pdf";

/// Default edge length, in pixels, of the square a thumbnail must fit in.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 240;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as they were read.
    None,
    /// Compress streams.
    #[default]
    Standard,
    /// Compress streams and drop unreachable objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfMergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfMergeError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// How first-page previews are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailSettings {
    /// Edge length of the bounding square, in pixels.
    pub max_size: u32,

    /// Directory searched for the PDFium library before the system paths.
    pub library_dir: Option<PathBuf>,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_THUMBNAIL_SIZE,
            library_dir: None,
        }
    }
}

/// Complete configuration for a merge session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial output path. Relative paths resolve against the working directory.
    pub output: PathBuf,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Write through a temporary file and rename on success.
    pub atomic_writes: bool,

    /// Preview rendering; `None` disables previews.
    pub thumbnails: Option<ThumbnailSettings>,

    /// Number of parallel preview workers (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            compression: CompressionLevel::default(),
            atomic_writes: true,
            thumbnails: Some(ThumbnailSettings::default()),
            jobs: None,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the output path is empty
    /// - jobs count is zero
    /// - the thumbnail size is zero
    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(PdfMergeError::NoOutputPath);
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfMergeError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if let Some(thumbnails) = &self.thumbnails
            && thumbnails.max_size == 0
        {
            return Err(PdfMergeError::invalid_config(
                "Thumbnail size must be at least 1 pixel",
            ));
        }

        Ok(())
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
