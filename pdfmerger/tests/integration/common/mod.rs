//! Helpers for the integration tests.
//!
//! Inputs are generated on the fly with `lopdf`. Every page carries a
//! MediaBox width of `tag * 100 + page_number`, so a merged document shows
//! which file and page each of its pages came from.

use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a PDF with `pages` blank pages to `path`.
pub fn create_test_pdf(path: &Path, pages: u32, tag: i64) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=pages)
        .map(|page_number| {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), (tag * 100 + page_number as i64).into(), 842.into()],
                "Contents" => content_id,
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("Failed to write test PDF");
}

/// Create one PDF per entry of `page_counts` in `dir`, tagged 1, 2, 3...
pub fn create_inputs(dir: &TempDir, page_counts: &[u32]) -> Vec<PathBuf> {
    page_counts
        .iter()
        .enumerate()
        .map(|(i, &pages)| {
            let path = dir.path().join(format!("part{}.pdf", i + 1));
            create_test_pdf(&path, pages, i as i64 + 1);
            path
        })
        .collect()
}

/// Expected page widths after merging inputs made by [`create_inputs`].
pub fn expected_widths(page_counts: &[u32]) -> Vec<i64> {
    page_counts
        .iter()
        .enumerate()
        .flat_map(|(i, &pages)| (1..=pages as i64).map(move |p| (i as i64 + 1) * 100 + p))
        .collect()
}

/// MediaBox widths of every page of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load merged PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_object(page_id).and_then(Object::as_dict).unwrap();
            let media_box = page.get(b"MediaBox").and_then(Object::as_array).unwrap();
            media_box[2].as_float().unwrap() as i64
        })
        .collect()
}
