//! Merging from the command line without a window.

use pdfmerger::Result;
use pdfmerger::merge::{self, MergeReport};
use pdfmerger::session::Session;
use pdfmerger::utils::{collect_pdf_paths, format_file_size};

use crate::config::AppConfig;

/// Expand the inputs, merge them and return the report.
///
/// The inputs go through the same list rules as the window: duplicates are
/// skipped, and a file that cannot be opened stops the run before anything
/// is written.
pub async fn run(config: &AppConfig, quiet: bool) -> Result<MergeReport> {
    let inputs = collect_pdf_paths(&config.inputs)?;

    let mut session = Session::with_output(config.merge.output.to_string_lossy());
    session.set_previews_enabled(false);

    let added = session.add_paths(&inputs);
    for duplicate in &added.duplicates {
        tracing::warn!(path = %duplicate.display(), "skipping duplicate input");
    }
    if let Some(failure) = added.failures.into_iter().next() {
        return Err(failure.error);
    }

    let plan = session.merge_plan()?;
    merge::merge_in_background(plan, config.merge.clone(), move |progress| {
        if !quiet {
            eprintln!("Merging file {}/{}...", progress.index, progress.total);
        }
    })
    .await
}

/// Render the report the way `--json` or a plain run prints it.
pub fn render_report(report: &MergeReport, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(report).unwrap_or_else(|e| {
            tracing::error!(error = %e, "cannot serialize report");
            String::new()
        });
    }

    format!(
        "Merged {} file(s) into {} pages\nOutput: {} ({})",
        report.files_merged,
        report.total_pages,
        report.output_path.display(),
        format_file_size(report.output_size)
    )
}
