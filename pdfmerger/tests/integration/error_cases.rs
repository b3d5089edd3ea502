//! Integration tests for error handling and edge cases.

use pdfmerger::config::Config;
use pdfmerger::error::{ErrorKind, PdfMergeError};
use pdfmerger::inspect::PageInspector;
use pdfmerger::io::writer::temp_path_for;
use pdfmerger::merge::{self, MergePlan};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::create_inputs;

#[test]
fn test_error_nonexistent_input() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("merged.pdf");

    let plan = MergePlan::new(vec![PathBuf::from("/nonexistent/file.pdf")], output.clone()).unwrap();
    let result = merge::merge_to_file(&plan, &Config::default(), |_| {});

    let err = result.unwrap_err();
    assert!(matches!(err, PdfMergeError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(!output.exists());
}

#[test]
fn test_error_empty_input_list() {
    let result = MergePlan::new(Vec::new(), PathBuf::from("merged.pdf"));

    let err = result.unwrap_err();
    assert!(matches!(err, PdfMergeError::NoFilesToMerge));
    assert_eq!(err.kind(), ErrorKind::Precondition);
}

#[test]
fn test_error_corrupt_input_aborts_whole_merge() {
    let temp_dir = TempDir::new().unwrap();
    let mut inputs = create_inputs(&temp_dir, &[2]);
    let corrupt = temp_dir.path().join("corrupt.pdf");
    std::fs::write(&corrupt, b"%PDF-1.4\nthis is not really a pdf").unwrap();
    inputs.push(corrupt);
    let output = temp_dir.path().join("merged.pdf");

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    let mut progress = Vec::new();
    let result = merge::merge_to_file(&plan, &Config::default(), |p| progress.push(p.index));

    assert!(result.is_err());
    assert_eq!(progress, vec![1, 2]);
    assert!(!output.exists(), "No partial output may be left behind");
    assert!(!temp_path_for(&output).exists());
}

#[test]
fn test_error_unwritable_output_leaves_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[1]);
    // A regular file where the output directory should be.
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();
    let output = blocker.join("merged.pdf");

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    let err = merge::merge_to_file(&plan, &Config::default(), |_| {}).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Merge);
    assert_eq!(err.exit_code(), 5);
    assert!(!output.exists());
}

#[test]
fn test_error_output_is_an_input() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[1, 1]);

    let result = MergePlan::new(inputs.clone(), inputs[1].clone());

    assert!(matches!(result, Err(PdfMergeError::InvalidConfig { .. })));
}

#[test]
fn test_inspect_rejects_non_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let text = temp_dir.path().join("notes.pdf");
    std::fs::write(&text, "plain text").unwrap();

    let err = PageInspector::new().inspect(&text).unwrap_err();

    assert!(matches!(err, PdfMergeError::FailedToLoadPdf { .. }));
    assert_eq!(err.kind(), ErrorKind::Open);
    assert!(err.to_string().contains("notes.pdf"));
}

#[test]
fn test_inspect_rejects_directory() {
    let temp_dir = TempDir::new().unwrap();

    let err = PageInspector::new().inspect(temp_dir.path()).unwrap_err();

    assert!(matches!(err, PdfMergeError::NotAFile { .. }));
}
