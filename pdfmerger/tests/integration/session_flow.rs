//! End-to-end flows through the file list: add, reorder, remove, merge.

use pdfmerger::config::Config;
use pdfmerger::error::PdfMergeError;
use pdfmerger::merge;
use pdfmerger::session::Session;
use pdfmerger::utils::collect_pdf_paths;
use tempfile::TempDir;

use crate::common::{create_inputs, create_test_pdf, page_widths};

#[test]
fn test_add_reorder_merge() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[1, 2, 1]);
    let output = temp_dir.path().join("out").join("book.pdf");

    let mut session = Session::new();
    session.add_paths(&inputs);
    session.select(2);
    session.move_up();
    session.move_up();
    session.set_output(output.to_string_lossy());

    let plan = session.merge_plan().unwrap();
    let report = merge::merge_to_file(&plan, &Config::default(), |_| {}).unwrap();

    assert_eq!(report.total_pages, session.total_pages());
    assert_eq!(page_widths(&output), vec![301, 101, 201, 202]);
}

#[test]
fn test_remove_then_merge() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[1, 1, 1]);
    let output = temp_dir.path().join("merged.pdf");

    let mut session = Session::with_output(output.to_string_lossy());
    session.add_paths(&inputs);
    session.select(1);
    session.remove_selected();
    assert_eq!(session.selected(), Some(1));

    let plan = session.merge_plan().unwrap();
    merge::merge_to_file(&plan, &Config::default(), |_| {}).unwrap();

    assert_eq!(page_widths(&output), vec![101, 301]);
}

#[test]
fn test_mixed_batch_from_directory() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("drop");
    std::fs::create_dir(&dir).unwrap();
    create_test_pdf(&dir.join("a.pdf"), 2, 1);
    create_test_pdf(&dir.join("b.PDF"), 1, 2);
    std::fs::write(dir.join("c.pdf"), b"broken").unwrap();
    std::fs::write(dir.join("readme.txt"), b"ignored").unwrap();

    let paths = collect_pdf_paths([&dir]).unwrap();
    let mut session = Session::new();
    let report = session.add_paths(&paths);

    assert_eq!(report.added.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("c.pdf"));
    assert_eq!(session.total_pages(), 3);
}

#[test]
fn test_clear_then_merge_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = create_inputs(&temp_dir, &[1]);

    let mut session = Session::new();
    session.add_paths(&inputs);
    session.clear();

    assert!(matches!(
        session.merge_plan(),
        Err(PdfMergeError::NoFilesToMerge)
    ));
    assert_eq!(session.output(), "merged.pdf");
}
