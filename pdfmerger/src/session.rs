//! The ordered file list.
//!
//! A [`Session`] owns the entries the user has added, the selection and the
//! output path. It is only ever mutated from one thread; background work
//! receives a [`MergePlan`] snapshot instead of the list itself.
//!
//! Invariants kept by every operation:
//! - the selection, when set, is a valid index
//! - no two entries share a source path

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_OUTPUT_FILE;
use crate::error::{PdfMergeError, Result};
use crate::inspect::PageInspector;
use crate::merge::MergePlan;
use crate::thumbnail::Thumbnail;
use crate::utils::resolve_path;

/// Preview state of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Preview {
    /// Rendering has been requested but has not finished.
    #[default]
    Pending,
    /// The first page, ready to show.
    Ready(Thumbnail),
    /// Rendering failed or previews are disabled.
    Unavailable,
}

/// One PDF in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    path: PathBuf,
    page_count: usize,
    preview: Preview,
    file_size: u64,
    version: String,
}

impl FileEntry {
    /// Source path, the entry's identity.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Preview state.
    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    /// File size in bytes when the file was added.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// PDF header version.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A file that could not be added.
#[derive(Debug, Serialize)]
pub struct AddFailure {
    /// Path as given.
    pub path: PathBuf,
    /// Why it was rejected.
    #[serde(serialize_with = "serialize_display")]
    pub error: PdfMergeError,
}

/// Outcome of adding a batch of files.
#[derive(Debug, Default, Serialize)]
pub struct AddReport {
    /// Newly added paths, in list order.
    pub added: Vec<PathBuf>,
    /// Paths skipped because they were already listed.
    pub duplicates: Vec<PathBuf>,
    /// Paths that failed the page-count check.
    pub failures: Vec<AddFailure>,
}

fn serialize_display<S>(error: &PdfMergeError, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(error)
}

/// Ordered file list, selection and output path.
#[derive(Debug, Clone)]
pub struct Session {
    entries: Vec<FileEntry>,
    selected: Option<usize>,
    output: String,
    previews: bool,
    inspector: PageInspector,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            selected: None,
            output: DEFAULT_OUTPUT_FILE.to_string(),
            previews: true,
            inspector: PageInspector::new(),
        }
    }
}

impl Session {
    /// An empty session writing to `merged.pdf`.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty session writing to `output`.
    pub fn with_output(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// Whether new entries start as [`Preview::Pending`] or [`Preview::Unavailable`].
    pub fn set_previews_enabled(&mut self, enabled: bool) {
        self.previews = enabled;
    }

    /// Entries in merge order.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected index, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selected entry, if any.
    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Current output path text.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Sum of all page counts.
    pub fn total_pages(&self) -> usize {
        self.entries.iter().map(FileEntry::page_count).sum()
    }

    /// Whether `path` is already listed.
    pub fn contains(&self, path: &Path) -> bool {
        let key = resolve_path(path);
        self.entries.iter().any(|entry| entry.path == key)
    }

    /// Check and append each path in order.
    ///
    /// Paths already in the list are skipped. A path that fails the check is
    /// reported and leaves the list untouched.
    pub fn add_paths<I>(&mut self, paths: I) -> AddReport
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let mut report = AddReport::default();

        for path in paths {
            let path = path.as_ref();
            let key = resolve_path(path);
            if self.entries.iter().any(|entry| entry.path == key) {
                tracing::debug!(path = %key.display(), "already listed");
                report.duplicates.push(key);
                continue;
            }

            match self.inspector.inspect(&key) {
                Ok(info) => {
                    tracing::debug!(path = %key.display(), pages = info.page_count, "added");
                    self.entries.push(FileEntry {
                        path: key.clone(),
                        page_count: info.page_count,
                        preview: if self.previews {
                            Preview::Pending
                        } else {
                            Preview::Unavailable
                        },
                        file_size: info.file_size,
                        version: info.version,
                    });
                    report.added.push(key);
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "cannot add file");
                    report.failures.push(AddFailure {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }

        report
    }

    /// Select the entry at `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Swap the selected entry with the one above it.
    pub fn move_up(&mut self) -> bool {
        match self.selected {
            Some(i) if i > 0 => {
                self.entries.swap(i, i - 1);
                self.selected = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Swap the selected entry with the one below it.
    pub fn move_down(&mut self) -> bool {
        match self.selected {
            Some(i) if i + 1 < self.entries.len() => {
                self.entries.swap(i, i + 1);
                self.selected = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    /// Remove the selected entry and clamp the selection.
    pub fn remove_selected(&mut self) -> Option<FileEntry> {
        let index = self.selected?;
        let removed = self.entries.remove(index);
        self.selected = if self.entries.is_empty() {
            None
        } else {
            Some(index.min(self.entries.len() - 1))
        };
        Some(removed)
    }

    /// Empty the list and reset the output path.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected = None;
        self.output = DEFAULT_OUTPUT_FILE.to_string();
    }

    /// Replace the output path text.
    pub fn set_output(&mut self, output: impl Into<String>) {
        self.output = output.into();
    }

    /// Output path text, for editing in place.
    pub fn output_mut(&mut self) -> &mut String {
        &mut self.output
    }

    /// Store a finished render for `path`.
    ///
    /// Returns `false` when the path is no longer listed, in which case the
    /// result is dropped.
    pub fn set_thumbnail(&mut self, path: &Path, thumbnail: Option<Thumbnail>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => {
                entry.preview = match thumbnail {
                    Some(thumbnail) => Preview::Ready(thumbnail),
                    None => Preview::Unavailable,
                };
                true
            }
            None => {
                tracing::debug!(path = %path.display(), "dropping preview for removed file");
                false
            }
        }
    }

    /// Paths in merge order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|entry| entry.path.clone()).collect()
    }

    /// Snapshot the list for a merge.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::NoFilesToMerge`] if the list is empty
    /// - [`PdfMergeError::NoOutputPath`] if the output path is blank
    /// - [`PdfMergeError::InvalidConfig`] if the output is one of the inputs
    pub fn merge_plan(&self) -> Result<MergePlan> {
        if self.entries.is_empty() {
            return Err(PdfMergeError::NoFilesToMerge);
        }
        let output = self.output.trim();
        if output.is_empty() {
            return Err(PdfMergeError::NoOutputPath);
        }

        Ok(MergePlan::new(self.paths(), PathBuf::from(output))?
            .with_expected_pages(self.total_pages()))
    }
}
