//! Native file dialogs.

use std::path::PathBuf;

use pdfmerger::config::DEFAULT_OUTPUT_FILE;
use pdfmerger::utils::ensure_pdf_extension;

/// Ask for PDF files to add. Empty when the dialog is dismissed.
pub fn pick_pdfs() -> Vec<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select PDF files to merge")
        .add_filter("PDF files", &["pdf"])
        .add_filter("All files", &["*"])
        .pick_files()
        .unwrap_or_default()
}

/// Ask where to save the merged PDF.
pub fn save_output() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save merged PDF as")
        .set_file_name(DEFAULT_OUTPUT_FILE)
        .add_filter("PDF files", &["pdf"])
        .save_file()
        .map(ensure_pdf_extension)
}
