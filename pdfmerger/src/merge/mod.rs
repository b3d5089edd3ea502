//! PDF merging.
//!
//! A merge is described by a [`MergePlan`], an immutable snapshot of the
//! inputs and the output path taken when the merge is requested. Running a
//! plan loads every input in order, joins the page trees and writes the
//! result with [`PdfWriter`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerger::config::Config;
//! use pdfmerger::merge::{self, MergePlan};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = MergePlan::new(
//!     vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
//!     PathBuf::from("merged.pdf"),
//! )?;
//! let report = merge::merge_to_file(&plan, &Config::default(), |_| {})?;
//! println!("Wrote {} pages to {}", report.total_pages, report.output_path.display());
//! # Ok(())
//! # }
//! ```

mod merger;

pub use merger::{MergeProgress, MergeResult, MergeStatistics, Merger};

use serde::Serialize;
use std::path::PathBuf;
use tokio::task;

use crate::config::Config;
use crate::error::{PdfMergeError, Result};
use crate::io::{PdfWriter, WriteOptions};
use crate::utils::{resolve_path, same_file};

/// Inputs and output of one merge, fixed when the merge is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    inputs: Vec<PathBuf>,
    output: PathBuf,
    expected_pages: usize,
}

impl MergePlan {
    /// Build a plan, resolving a relative output against the working directory.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::NoFilesToMerge`] if `inputs` is empty
    /// - [`PdfMergeError::NoOutputPath`] if `output` is empty
    /// - [`PdfMergeError::InvalidConfig`] if `output` is one of the inputs
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> Result<Self> {
        if inputs.is_empty() {
            return Err(PdfMergeError::NoFilesToMerge);
        }
        if output.as_os_str().is_empty() {
            return Err(PdfMergeError::NoOutputPath);
        }
        if let Some(input) = inputs.iter().find(|input| same_file(input, &output)) {
            return Err(PdfMergeError::invalid_config(format!(
                "Output file {} is also an input",
                input.display()
            )));
        }

        Ok(Self {
            inputs,
            output: resolve_path(&output),
            expected_pages: 0,
        })
    }

    /// Record the page total the file list expects, for reporting.
    pub fn with_expected_pages(mut self, pages: usize) -> Self {
        self.expected_pages = pages;
        self
    }

    /// Input paths in merge order.
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    /// Absolute output path.
    pub fn output(&self) -> &PathBuf {
        &self.output
    }

    /// Page total the file list expected when the plan was taken.
    pub fn expected_pages(&self) -> usize {
        self.expected_pages
    }
}

/// Summary of a finished merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// Number of input files merged.
    pub files_merged: usize,

    /// Pages in the written document.
    pub total_pages: usize,

    /// Where the document was written.
    pub output_path: PathBuf,

    /// Size of the written document in bytes.
    pub output_size: u64,

    /// Wall time of load, merge and write, in milliseconds.
    pub elapsed_ms: u64,
}

/// Run `plan` on the calling thread and write the result.
///
/// `on_progress` is called before each input is opened.
///
/// # Errors
///
/// Returns the first load, merge or write error. Nothing is left at the
/// output path when writes are atomic.
pub fn merge_to_file<F>(plan: &MergePlan, config: &Config, on_progress: F) -> Result<MergeReport>
where
    F: FnMut(MergeProgress),
{
    let merger = Merger::with_compression(config.compression);
    let mut result = merger.merge_paths(&plan.inputs, on_progress)?;

    if plan.expected_pages != 0 && plan.expected_pages != result.statistics.total_pages {
        tracing::warn!(
            expected = plan.expected_pages,
            actual = result.statistics.total_pages,
            "merged page count differs from file list"
        );
    }

    let writer = PdfWriter::with_options(WriteOptions {
        atomic: config.atomic_writes,
        ..WriteOptions::default()
    });
    let written = writer.save(&mut result.document, &plan.output)?;

    Ok(MergeReport {
        files_merged: result.statistics.files_merged,
        total_pages: result.statistics.total_pages,
        output_path: written.output_path,
        output_size: written.file_size,
        elapsed_ms: (result.statistics.merge_time + written.write_time).as_millis() as u64,
    })
}

/// Run `plan` on the blocking pool.
///
/// # Errors
///
/// As [`merge_to_file`], plus an error if the blocking task panics.
pub async fn merge_in_background<F>(
    plan: MergePlan,
    config: Config,
    on_progress: F,
) -> Result<MergeReport>
where
    F: FnMut(MergeProgress) + Send + 'static,
{
    task::spawn_blocking(move || merge_to_file(&plan, &config, on_progress))
        .await
        .map_err(|e| PdfMergeError::other(format!("Merge task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::writer::temp_path_for;
    use crate::test_utils::{create_test_pdf, page_widths};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[test]
    fn test_plan_rejects_empty_inputs() {
        let result = MergePlan::new(Vec::new(), PathBuf::from("out.pdf"));
        assert!(matches!(result, Err(PdfMergeError::NoFilesToMerge)));
    }

    #[test]
    fn test_plan_rejects_empty_output() {
        let result = MergePlan::new(vec![PathBuf::from("a.pdf")], PathBuf::new());
        assert!(matches!(result, Err(PdfMergeError::NoOutputPath)));
    }

    #[test]
    fn test_plan_rejects_output_that_is_an_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.pdf");
        create_test_pdf(&input, 1, 1).unwrap();

        let result = MergePlan::new(vec![input.clone()], input);
        assert!(matches!(result, Err(PdfMergeError::InvalidConfig { .. })));
    }

    #[test]
    fn test_plan_resolves_relative_output() {
        let plan = MergePlan::new(vec![PathBuf::from("a.pdf")], PathBuf::from("merged.pdf"))
            .unwrap()
            .with_expected_pages(3);

        assert!(plan.output().is_absolute());
        assert!(plan.output().ends_with("merged.pdf"));
        assert_eq!(plan.expected_pages(), 3);
        assert_eq!(plan.inputs(), &[PathBuf::from("a.pdf")]);
    }

    #[test]
    fn test_merge_to_file_writes_report() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.pdf");
        let b = temp_dir.path().join("b.pdf");
        create_test_pdf(&a, 2, 1).unwrap();
        create_test_pdf(&b, 1, 2).unwrap();
        let output = temp_dir.path().join("out").join("merged.pdf");

        let plan = MergePlan::new(vec![a, b], output.clone())
            .unwrap()
            .with_expected_pages(3);
        let report = merge_to_file(&plan, &Config::default(), |_| {}).unwrap();

        assert_eq!(report.files_merged, 2);
        assert_eq!(report.total_pages, 3);
        assert_eq!(report.output_path, output);
        assert!(report.output_size > 0);
        assert_eq!(page_widths(&output), vec![101, 102, 201]);
    }

    #[test]
    fn test_failed_merge_keeps_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.pdf");
        let bad = temp_dir.path().join("bad.pdf");
        create_test_pdf(&good, 1, 1).unwrap();
        std::fs::write(&bad, b"garbage").unwrap();
        let output = temp_dir.path().join("merged.pdf");
        std::fs::write(&output, b"previous result").unwrap();

        let plan = MergePlan::new(vec![good, bad], output.clone()).unwrap();
        let result = merge_to_file(&plan, &Config::default(), |_| {});

        assert!(result.is_err());
        assert_eq!(std::fs::read(&output).unwrap(), b"previous result");
        assert!(!temp_path_for(&output).exists());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = MergeReport {
            files_merged: 2,
            total_pages: 7,
            output_path: PathBuf::from("/tmp/merged.pdf"),
            output_size: 1024,
            elapsed_ms: 12,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["filesMerged"], 2);
        assert_eq!(json["totalPages"], 7);
        assert_eq!(json["outputPath"], "/tmp/merged.pdf");
    }

    #[tokio::test]
    async fn test_merge_in_background_reports_progress() {
        let temp_dir = TempDir::new().unwrap();
        let inputs: Vec<PathBuf> = (1..=3)
            .map(|i| {
                let path = temp_dir.path().join(format!("{i}.pdf"));
                create_test_pdf(&path, 1, i).unwrap();
                path
            })
            .collect();
        let plan = MergePlan::new(inputs, temp_dir.path().join("merged.pdf")).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let report = merge_in_background(plan, Config::default(), move |p| {
            sink.lock().unwrap().push(p.index);
        })
        .await
        .unwrap();

        assert_eq!(report.total_pages, 3);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
}
