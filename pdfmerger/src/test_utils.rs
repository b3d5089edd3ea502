//! Helpers shared by the unit tests.

use lopdf::{Document, Object, Stream, dictionary};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Write a minimal PDF with `pages` blank pages.
///
/// Every page gets a MediaBox width of `tag * 100 + page_number`, so tests can
/// tell after a merge which file and which page a page came from.
pub fn create_test_pdf(path: &Path, pages: u32, tag: i64) -> Result<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let resources_id = doc.add_object(dictionary! {
        "ProcSet" => vec![Object::Name(b"PDF".to_vec())],
    });

    let mut kids = Vec::new();
    for page_number in 1..=pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (tag * 100 + page_number as i64).into(), 842.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

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

    let mut file = File::create(path)?;
    doc.save_to(&mut file)?;
    file.flush()?;

    Ok(())
}

/// MediaBox widths of every page of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("merged output should load");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc
                .get_object(page_id)
                .and_then(Object::as_dict)
                .expect("page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("media box");
            media_box[2].as_float().expect("numeric width") as i64
        })
        .collect()
}
