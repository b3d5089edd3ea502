//! Utilities for path collection and output path handling.

use crate::{Result, error::PdfMergeError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether `path` has a `.pdf` extension, in any case.
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Append `.pdf` unless the path already ends in it (any case).
pub fn ensure_pdf_extension(path: PathBuf) -> PathBuf {
    if is_pdf_path(&path) {
        return path;
    }
    let mut raw = path.into_os_string();
    raw.push(".pdf");
    PathBuf::from(raw)
}

/// Turn user inputs into an ordered list of PDF paths.
///
/// Each input is handled in turn, keeping the order it was given in:
/// - a directory is walked recursively, entries sorted by name
/// - an existing file is kept as is when it looks like a PDF
/// - anything else is treated as a glob pattern
///
/// Only `.pdf` paths survive. A plain path that does not exist and matches
/// nothing as a pattern is kept, so the caller reports it as missing.
///
/// # Errors
///
/// Propagates `glob` pattern errors and unreadable glob entries.
pub fn collect_pdf_paths<T>(inputs: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<Path>,
{
    let mut resolved_paths = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            resolved_paths.extend(collect_pdfs_in_dir(input));
        } else if input.is_file() {
            if is_pdf_path(input) {
                resolved_paths.push(input.to_path_buf());
            } else {
                tracing::debug!(path = %input.display(), "skipping non-pdf input");
            }
        } else {
            let matches = collect_paths_for_pattern(&input.to_string_lossy())?;
            if matches.is_empty() && is_pdf_path(input) {
                resolved_paths.push(input.to_path_buf());
            } else {
                resolved_paths.extend(matches.into_iter().filter(|p| is_pdf_path(p)));
            }
        }
    }

    Ok(resolved_paths)
}

/// Every `.pdf` file below `dir`, sorted by file name at each level.
pub fn collect_pdfs_in_dir(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_pdf_path(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./docs/*.pdf"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| PdfMergeError::other(err.to_string()))?;

    paths
        .map(|entry| entry.map_err(|err| PdfMergeError::other(err.to_string())))
        .collect()
}

/// Resolve a relative path against the current working directory.
pub fn resolve_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Whether two paths name the same file, following symlinks when both exist.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => resolve_path(a) == resolve_path(b),
    }
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"%PDF-1.4").unwrap();
    }

    #[rstest]
    #[case("a.pdf", true)]
    #[case("A.PDF", true)]
    #[case("scan.Pdf", true)]
    #[case("notes.txt", false)]
    #[case("pdf", false)]
    #[case("archive.pdf.zip", false)]
    fn test_is_pdf_path(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_pdf_path(Path::new(path)), expected);
    }

    #[rstest]
    #[case("out", "out.pdf")]
    #[case("out.pdf", "out.pdf")]
    #[case("OUT.PDF", "OUT.PDF")]
    #[case("report.v2", "report.v2.pdf")]
    fn test_ensure_pdf_extension(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(
            ensure_pdf_extension(PathBuf::from(input)),
            PathBuf::from(expected)
        );
    }

    #[test]
    fn test_collect_keeps_input_order_and_filters() {
        let temp_dir = TempDir::new().unwrap();
        let b = temp_dir.path().join("b.pdf");
        let a = temp_dir.path().join("a.PDF");
        let txt = temp_dir.path().join("notes.txt");
        for p in [&a, &b, &txt] {
            touch(p);
        }

        let paths = collect_pdf_paths([&b, &txt, &a]).unwrap();
        assert_eq!(paths, vec![b, a]);
    }

    #[test]
    fn test_collect_walks_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("z.pdf"));
        touch(&root.join("sub").join("m.pdf"));
        touch(&root.join("sub").join("readme.md"));

        let paths = collect_pdf_paths([root]).unwrap();
        assert_eq!(paths, vec![root.join("sub").join("m.pdf"), root.join("z.pdf")]);
    }

    #[test]
    fn test_collect_expands_globs() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("one.pdf"));
        touch(&temp_dir.path().join("two.pdf"));
        touch(&temp_dir.path().join("three.txt"));

        let pattern = temp_dir.path().join("*");
        let paths = collect_pdf_paths([pattern]).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| is_pdf_path(p)));
    }

    #[test]
    fn test_collect_keeps_missing_pdf_for_reporting() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.pdf");

        assert_eq!(collect_pdf_paths([&missing]).unwrap(), vec![missing]);
    }

    #[test]
    fn test_same_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.pdf");
        touch(&file);

        let dotted = temp_dir.path().join(".").join("a.pdf");
        assert!(same_file(&file, &dotted));
        assert!(!same_file(&file, &temp_dir.path().join("b.pdf")));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 bytes");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.00 GB");
    }
}
