#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfmerger::inspect::PageInspector;
use pdfmerger::session::Session;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    let mut file = match tempfile::Builder::new().suffix(".pdf").tempfile() {
        Ok(file) => file,
        Err(_) => return,
    };
    if file.write_all(data).and_then(|()| file.flush()).is_err() {
        return;
    }

    // Arbitrary bytes must never panic: either a page count or an error.
    let inspected = PageInspector::new().inspect(file.path());

    let mut session = Session::new();
    let report = session.add_paths([file.path()]);
    assert_eq!(inspected.is_ok(), report.added.len() == 1);
    assert_eq!(session.len(), report.added.len());
});
