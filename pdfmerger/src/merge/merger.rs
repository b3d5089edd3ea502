//! Core PDF merging implementation.
//!
//! The first input becomes the base document. Its page tree is moved under a
//! fresh root `Pages` node that carries no inheritable attributes. Every
//! further input is renumbered above the base's highest object id, its
//! objects are moved in, and its own page tree becomes the next child of that
//! root. Each source tree keeps only the `Rotate`, `MediaBox`, `CropBox` and
//! `Resources` it inherited in its own file, and page order within each input
//! is untouched, so the output reads in list order.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::CompressionLevel;
use crate::error::{PdfMergeError, Result};
use crate::inspect::parse_version;
use crate::io::PdfReader;

/// Progress of a running merge, reported before each input is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeProgress {
    /// One-based position of the input being merged.
    pub index: usize,

    /// Number of inputs in the merge.
    pub total: usize,

    /// Path of the input being merged.
    pub path: PathBuf,
}

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in merged document.
    pub total_pages: usize,

    /// Total time taken for merge.
    pub merge_time: Duration,

    /// Total size of input files.
    pub input_size: u64,

    /// Whether compression was applied.
    pub compressed: bool,
}

/// Result of a merge operation.
#[derive(Debug)]
pub struct MergeResult {
    /// The merged PDF document.
    pub document: Document,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// PDF merger that combines multiple documents.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    reader: PdfReader,
    compression: CompressionLevel,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger that writes streams at `compression`.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self {
            compression,
            ..Self::default()
        }
    }

    /// Merge the PDFs at `inputs`, in order, into one document.
    ///
    /// `on_progress` is called before each input is opened. The first
    /// input that cannot be loaded aborts the whole merge.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::NoFilesToMerge`] for an empty input list
    /// without touching the filesystem, or the load/merge error of the first
    /// input that fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfmerger::merge::Merger;
    /// # use std::path::PathBuf;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
    /// let result = Merger::new().merge_paths(&inputs, |p| {
    ///     println!("Merging file {}/{}...", p.index, p.total);
    /// })?;
    /// println!("{} pages", result.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge_paths<F>(&self, inputs: &[PathBuf], mut on_progress: F) -> Result<MergeResult>
    where
        F: FnMut(MergeProgress),
    {
        if inputs.is_empty() {
            return Err(PdfMergeError::NoFilesToMerge);
        }

        let merge_start = Instant::now();
        let total = inputs.len();
        let mut merged: Option<Document> = None;
        let mut input_size = 0;

        for (index, path) in inputs.iter().enumerate() {
            on_progress(MergeProgress {
                index: index + 1,
                total,
                path: path.clone(),
            });

            let loaded = self.reader.load(path)?;
            input_size += loaded.file_size;

            merged = Some(match merged {
                None => loaded.document,
                Some(mut base) => {
                    if index == 1 {
                        isolate_page_tree(&mut base, &inputs[0])?;
                    }
                    append_document(&mut base, loaded.document, path)?;
                    base
                }
            });
        }

        let mut document = merged.ok_or(PdfMergeError::NoFilesToMerge)?;
        self.finish(&mut document);

        let statistics = MergeStatistics {
            files_merged: total,
            total_pages: document.get_pages().len(),
            merge_time: merge_start.elapsed(),
            input_size,
            compressed: self.compression != CompressionLevel::None,
        };
        tracing::info!(
            files = statistics.files_merged,
            pages = statistics.total_pages,
            elapsed = ?statistics.merge_time,
            "merged documents"
        );

        Ok(MergeResult {
            document,
            statistics,
        })
    }

    fn finish(&self, merged: &mut Document) {
        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => merged.compress(),
            CompressionLevel::Maximum => {
                merged.prune_objects();
                merged.compress();
            }
        }

        merged.renumber_objects();
    }
}

/// Put a new, attribute-free root `Pages` node above the base page tree.
///
/// Later trees are attached to this root, not to the base root, so values the
/// base root passes down never reach their pages.
fn isolate_page_tree(base: &mut Document, path: &Path) -> Result<()> {
    let old_root = pages_root(base)
        .map_err(|e| PdfMergeError::corrupted_pdf(path.to_path_buf(), e.to_string()))?;
    let page_count = base.get_pages().len();

    let new_root = base.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(old_root)],
        "Count" => page_count as i64,
    });
    pages_dict_mut(base, old_root)?.set("Parent", Object::Reference(new_root));

    let catalog_id = base
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| PdfMergeError::corrupted_pdf(path.to_path_buf(), e.to_string()))?;
    base.get_object_mut(catalog_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfMergeError::merge_failed(format!("Failed to get catalog: {e}")))?
        .set("Pages", Object::Reference(new_root));

    Ok(())
}

/// Move every object of `doc` into `merged` and append its pages.
fn append_document(merged: &mut Document, mut doc: Document, path: &Path) -> Result<()> {
    doc.renumber_objects_with(merged.max_id + 1);

    let page_count = doc.get_pages().len();
    let doc_root = pages_root(&doc)
        .map_err(|e| PdfMergeError::corrupted_pdf(path.to_path_buf(), e.to_string()))?;
    let doc_catalog = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .ok();

    if is_newer_version(&doc.version, &merged.version) {
        tracing::debug!(from = %merged.version, to = %doc.version, "raising pdf version");
        merged.version = doc.version.clone();
    }

    // The incoming catalog is replaced by the base one.
    if let Some(catalog_id) = doc_catalog {
        doc.objects.remove(&catalog_id);
    }

    merged.max_id = merged.max_id.max(doc.max_id);
    merged.objects.extend(doc.objects);

    let merged_root = pages_root(merged)?;
    add_subtree(merged, merged_root, doc_root, page_count)
}

/// Hang the page tree rooted at `subtree` under `root`.
///
/// `root` must be the node created by [`isolate_page_tree`].
fn add_subtree(
    merged: &mut Document,
    root: ObjectId,
    subtree: ObjectId,
    page_count: usize,
) -> Result<()> {
    pages_dict_mut(merged, subtree)?.set("Parent", Object::Reference(root));

    let dict = pages_dict_mut(merged, root)?;
    match dict.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(subtree)),
        Ok(_) => return Err(PdfMergeError::merge_failed("Kids is not an array")),
        Err(_) => {
            return Err(PdfMergeError::merge_failed(
                "Pages dictionary missing Kids array",
            ));
        }
    }

    let current_count = dict.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    dict.set("Count", Object::Integer(current_count + page_count as i64));

    Ok(())
}

fn pages_root(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| PdfMergeError::merge_failed(format!("Failed to get pages reference: {e}")))
}

fn pages_dict_mut(doc: &mut Document, id: ObjectId) -> Result<&mut Dictionary> {
    doc.get_object_mut(id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PdfMergeError::merge_failed(format!("Failed to get pages object: {e}")))
}

fn is_newer_version(candidate: &str, current: &str) -> bool {
    match (parse_version(candidate), parse_version(current)) {
        (Some(candidate), Some(current)) => candidate > current,
        (Some(_), None) => true,
        _ => false,
    }
}
