//! Integration tests for basic PDF merging operations.

use pdfmerger::config::{CompressionLevel, Config};
use pdfmerger::io::PdfReader;
use pdfmerger::merge::{self, MergePlan};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{create_inputs, expected_widths, page_widths};

#[test]
fn test_merge_two_simple_pdfs() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[1, 1]);
    let output = temp_dir.path().join("merged.pdf");

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    let report = merge::merge_to_file(&plan, &Config::default(), |_| {});
    assert!(report.is_ok(), "Merge failed: {:?}", report.err());

    let report = report.unwrap();
    assert_eq!(report.files_merged, 2);
    assert_eq!(report.total_pages, 2);
    assert!(output.exists(), "Output file was not created");
}

#[rstest]
#[case(&[1])]
#[case(&[2, 3])]
#[case(&[5, 1, 4])]
#[case(&[1, 0, 1])]
fn test_merge_preserves_file_and_page_order(#[case] page_counts: &[u32]) {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, page_counts);
    let output = temp_dir.path().join("merged.pdf");

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    let report = merge::merge_to_file(&plan, &Config::default(), |_| {}).unwrap();

    let total: u32 = page_counts.iter().sum();
    assert_eq!(report.total_pages, total as usize);
    assert_eq!(page_widths(&output), expected_widths(page_counts));
}

#[test]
fn test_merge_reordered_inputs() {
    let temp_dir = TempDir::new().unwrap();
    let mut inputs = create_inputs(&temp_dir, &[2, 1]);
    inputs.reverse();
    let output = temp_dir.path().join("merged.pdf");

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    merge::merge_to_file(&plan, &Config::default(), |_| {}).unwrap();

    assert_eq!(page_widths(&output), vec![201, 101, 102]);
}

#[test]
fn test_merge_same_file_twice() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[2]);
    let output = temp_dir.path().join("merged.pdf");

    let plan = MergePlan::new(vec![inputs[0].clone(), inputs[0].clone()], output.clone()).unwrap();
    merge::merge_to_file(&plan, &Config::default(), |_| {}).unwrap();

    assert_eq!(page_widths(&output), vec![101, 102, 101, 102]);
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
fn test_merge_with_compression(#[case] compression: CompressionLevel) {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[3, 2]);
    let output = temp_dir.path().join("merged.pdf");
    let config = Config {
        compression,
        ..Config::default()
    };

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    merge::merge_to_file(&plan, &config, |_| {}).unwrap();

    let loaded = PdfReader::new().load(&output).unwrap();
    assert_eq!(loaded.page_count, 5);
}

#[test]
fn test_merge_without_atomic_writes() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[1, 2]);
    let output = temp_dir.path().join("direct.pdf");
    let config = Config {
        atomic_writes: false,
        ..Config::default()
    };

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    let report = merge::merge_to_file(&plan, &config, |_| {}).unwrap();

    assert_eq!(report.output_path, output);
    assert_eq!(page_widths(&output), vec![101, 201, 202]);
}

#[test]
fn test_merge_overwrites_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[1]);
    let output = temp_dir.path().join("merged.pdf");
    std::fs::write(&output, b"old contents").unwrap();

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    merge::merge_to_file(&plan, &Config::default(), |_| {}).unwrap();

    assert_eq!(page_widths(&output), vec![101]);
}

#[tokio::test]
async fn test_merge_in_background() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[2, 2]);
    let output = temp_dir.path().join("merged.pdf");

    let plan = MergePlan::new(inputs, output.clone()).unwrap();
    let report = merge::merge_in_background(plan, Config::default(), |_| {})
        .await
        .unwrap();

    assert_eq!(report.total_pages, 4);
    assert!(report.output_size > 0);
    assert_eq!(page_widths(&output), vec![101, 102, 201, 202]);
}
