//! Window state and the event handlers that change it.
//!
//! [`AppState`] decides what every button, drop and background event does.
//! The egui layer in `app.rs` only draws it and forwards input, so all of
//! the behavior here is testable without a window.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use pdfmerger::error::PdfMergeError;
use pdfmerger::merge::{MergePlan, MergeProgress, MergeReport};
use pdfmerger::session::{Preview, Session};
use pdfmerger::thumbnail::Thumbnail;
use pdfmerger::utils::{collect_pdfs_in_dir, ensure_pdf_extension, is_pdf_path};

/// Message from a background task to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    /// A preview finished, `None` when rendering failed.
    Thumbnail {
        /// Source path the preview belongs to.
        path: PathBuf,
        /// Rendered first page.
        thumbnail: Option<Thumbnail>,
    },
    /// The running merge moved on to the next file.
    MergeProgress(MergeProgress),
    /// The running merge ended.
    MergeFinished(pdfmerger::Result<MergeReport>),
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A modal message waiting to be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        let title = match level {
            NoticeLevel::Info => "Success",
            NoticeLevel::Warning => "Warning",
            NoticeLevel::Error => "Error",
        };
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Whether a merge is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MergeStatus {
    #[default]
    Idle,
    Running {
        /// The busy window is shown. Hiding it does not stop the merge.
        dialog_visible: bool,
        /// Last progress report, if any arrived yet.
        progress: Option<MergeProgress>,
    },
}

/// What the success actions open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTarget {
    File,
    Folder,
}

/// Everything the window shows, plus the handlers that change it.
#[derive(Debug)]
pub struct AppState {
    session: Session,
    status: String,
    notices: VecDeque<Notice>,
    merge: MergeStatus,
    last_report: Option<MergeReport>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            status: "Ready".to_string(),
            notices: VecDeque::new(),
            merge: MergeStatus::Idle,
            last_report: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Output path text, bound to the output field.
    pub fn output_mut(&mut self) -> &mut String {
        self.session.output_mut()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn merge_status(&self) -> &MergeStatus {
        &self.merge
    }

    pub fn is_merging(&self) -> bool {
        matches!(self.merge, MergeStatus::Running { .. })
    }

    /// Report of the last successful merge, while its actions are offered.
    pub fn last_report(&self) -> Option<&MergeReport> {
        self.last_report.as_ref()
    }

    /// The notice to show now.
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    /// Acknowledge the current notice.
    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice::new(level, message));
    }

    /// Add files picked in the open dialog or given on the command line.
    ///
    /// Returns the paths that were added, which still need previews.
    pub fn add_files(&mut self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        if paths.is_empty() {
            return Vec::new();
        }

        let report = self.session.add_paths(&paths);
        for failure in &report.failures {
            self.notify(
                NoticeLevel::Error,
                format!(
                    "Could not open {}:\n{}",
                    failure.path.display(),
                    failure.error
                ),
            );
        }

        let added = report.added.len();
        self.status = format!(
            "Added {added} {}. Total: {}",
            if added == 1 { "file" } else { "files" },
            self.session.len()
        );
        report.added
    }

    /// Add files dropped onto the window.
    ///
    /// Directories are searched recursively; anything but `.pdf` is ignored.
    pub fn handle_drop(&mut self, dropped: Vec<PathBuf>) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for path in dropped {
            if path.is_dir() {
                paths.extend(collect_pdfs_in_dir(&path));
            } else if is_pdf_path(&path) {
                paths.push(path);
            } else {
                tracing::debug!(path = %path.display(), "ignoring dropped non-pdf");
            }
        }
        self.add_files(paths)
    }

    pub fn select(&mut self, index: usize) {
        self.session.select(index);
    }

    pub fn move_up(&mut self) {
        self.session.move_up();
    }

    pub fn move_down(&mut self) {
        self.session.move_down();
    }

    pub fn remove_selected(&mut self) {
        if self.session.remove_selected().is_some() {
            self.status = format!("Removed 1 file. Total: {}", self.session.len());
        }
    }

    /// Use a path chosen in the save dialog as output, forcing `.pdf`.
    pub fn choose_output(&mut self, path: PathBuf) {
        let path = ensure_pdf_extension(path);
        self.session.set_output(path.to_string_lossy());
    }

    /// Caption above the preview area.
    pub fn preview_caption(&self) -> &'static str {
        match self.session.selected_entry().map(|entry| entry.preview()) {
            None => "Select a file to preview first page",
            Some(Preview::Pending) => "Generating preview...",
            Some(Preview::Ready(_)) => "First page preview:",
            Some(Preview::Unavailable) => "Preview not available",
        }
    }

    /// Start a merge if none is running and the list is ready.
    ///
    /// Returns the plan to hand to the background task. Rejections are
    /// queued as notices instead.
    pub fn begin_merge(&mut self) -> Option<MergePlan> {
        if self.is_merging() {
            return None;
        }

        match self.session.merge_plan() {
            Ok(plan) => {
                self.merge = MergeStatus::Running {
                    dialog_visible: true,
                    progress: None,
                };
                self.last_report = None;
                self.status = "Merging PDFs...".to_string();
                tracing::info!(
                    files = plan.inputs().len(),
                    output = %plan.output().display(),
                    "starting merge"
                );
                Some(plan)
            }
            Err(PdfMergeError::NoFilesToMerge) => {
                self.notify(NoticeLevel::Warning, "No PDF files to merge!");
                None
            }
            Err(PdfMergeError::NoOutputPath) => {
                self.notify(NoticeLevel::Warning, "Please specify output file path!");
                None
            }
            Err(err) => {
                self.notify(NoticeLevel::Error, err.to_string());
                None
            }
        }
    }

    /// Hide the busy window. The merge keeps running.
    pub fn cancel_dialog(&mut self) {
        if let MergeStatus::Running { dialog_visible, .. } = &mut self.merge {
            *dialog_visible = false;
        }
    }

    /// Apply a background event.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Thumbnail { path, thumbnail } => {
                self.session.set_thumbnail(&path, thumbnail);
            }
            AppEvent::MergeProgress(progress) => {
                if let MergeStatus::Running { progress: slot, .. } = &mut self.merge {
                    self.status = format!("Merging file {}/{}...", progress.index, progress.total);
                    *slot = Some(progress);
                }
            }
            AppEvent::MergeFinished(Ok(report)) => {
                self.merge = MergeStatus::Idle;
                let name = file_name(&report.output_path);
                self.status = format!("Success: {name}");
                self.notify(
                    NoticeLevel::Info,
                    format!(
                        "PDF files merged successfully!\n\n\
                         Total files: {}\nTotal pages: {}\nOutput file: {name}",
                        report.files_merged, report.total_pages
                    ),
                );
                self.last_report = Some(report);
            }
            AppEvent::MergeFinished(Err(err)) => {
                self.merge = MergeStatus::Idle;
                tracing::error!(error = %err, "merge failed");
                self.status = "Merge failed".to_string();
                self.notify(NoticeLevel::Error, format!("Failed to merge PDFs:\n{err}"));
            }
        }
    }

    /// Open the merged file or its folder with `opener`.
    pub fn open_output_with<F>(&mut self, target: OpenTarget, opener: F)
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        let Some(report) = &self.last_report else {
            return;
        };
        let path = match target {
            OpenTarget::File => report.output_path.clone(),
            OpenTarget::Folder => report
                .output_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        if let Err(err) = opener(&path) {
            let what = match target {
                OpenTarget::File => "file",
                OpenTarget::Folder => "folder",
            };
            self.notify(NoticeLevel::Error, format!("Could not open {what}:\n{err}"));
        }
    }

    /// "Merge Again": empty the list and start over.
    pub fn reset_for_next_merge(&mut self) {
        self.session.clear();
        self.last_report = None;
        self.status = "Ready for next merge".to_string();
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
