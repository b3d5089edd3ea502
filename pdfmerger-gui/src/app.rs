//! The merger window.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::load::SizedTexture;
use egui::{CentralPanel, ColorImage, ScrollArea, SidePanel, TextureHandle, TextureOptions, TopBottomPanel};
use pdfmerger::config::Config;
use pdfmerger::merge;
use pdfmerger::session::Preview;
use pdfmerger::thumbnail::{self, ThumbnailRenderer};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::dialogs;
use crate::state::{AppEvent, AppState, MergeStatus, NoticeLevel, OpenTarget};

/// eframe application wrapping [`AppState`].
pub struct MergerApp {
    state: AppState,
    config: Config,
    runtime: Handle,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    renderer: Option<Arc<dyn ThumbnailRenderer>>,
    textures: HashMap<PathBuf, TextureHandle>,
    /// Paths given on the command line, added on the first frame.
    startup_files: Vec<PathBuf>,
}

impl MergerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        state: AppState,
        config: Config,
        runtime: Handle,
        renderer: Option<Arc<dyn ThumbnailRenderer>>,
        startup_files: Vec<PathBuf>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            state,
            config,
            runtime,
            events_tx,
            events_rx,
            renderer,
            textures: HashMap::new(),
            startup_files,
        }
    }

    fn add_files(&mut self, ctx: &egui::Context, paths: Vec<PathBuf>) {
        let added = self.state.add_files(paths);
        self.request_previews(ctx, added);
    }

    fn handle_drop(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if dropped.is_empty() {
            return;
        }
        let added = self.state.handle_drop(dropped);
        self.request_previews(ctx, added);
    }

    fn request_previews(&self, ctx: &egui::Context, paths: Vec<PathBuf>) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        if paths.is_empty() {
            return;
        }

        let renderer = Arc::clone(renderer);
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        let workers = self.config.effective_jobs();
        self.runtime.spawn(async move {
            thumbnail::render_thumbnails(renderer, paths, workers, |path, thumbnail| {
                // The receiver only goes away with the window.
                let _ = tx.send(AppEvent::Thumbnail { path, thumbnail });
                ctx.request_repaint();
            })
            .await;
        });
    }

    fn start_merge(&mut self, ctx: &egui::Context) {
        let Some(plan) = self.state.begin_merge() else {
            return;
        };

        let config = self.config.clone();
        let progress_tx = self.events_tx.clone();
        let progress_ctx = ctx.clone();
        let done_tx = self.events_tx.clone();
        let done_ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = merge::merge_in_background(plan, config, move |progress| {
                let _ = progress_tx.send(AppEvent::MergeProgress(progress));
                progress_ctx.request_repaint();
            })
            .await;
            let _ = done_tx.send(AppEvent::MergeFinished(result));
            done_ctx.request_repaint();
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.state.apply(event);
        }
        let session = self.state.session();
        self.textures.retain(|path, _| session.contains(path));
    }

    fn texture_for(&mut self, ctx: &egui::Context, path: &Path) -> Option<TextureHandle> {
        if let Some(texture) = self.textures.get(path) {
            return Some(texture.clone());
        }

        let entry = self.state.session().entries().iter().find(|e| e.path() == path)?;
        let Preview::Ready(thumb) = entry.preview() else {
            return None;
        };
        let image = ColorImage::from_rgba_unmultiplied(thumb.size(), &thumb.rgba);
        let texture = ctx.load_texture(
            format!("preview:{}", path.display()),
            image,
            TextureOptions::default(),
        );
        self.textures.insert(path.to_path_buf(), texture.clone());
        Some(texture)
    }

    fn render_header(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.vertical_centered(|ui| {
            ui.heading(egui::RichText::new("PDF Merger - Offline").size(22.0).strong());
        });
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            if ui.button("Select PDF Files").clicked() {
                let paths = dialogs::pick_pdfs();
                self.add_files(ctx, paths);
            }
            ui.label(egui::RichText::new("or Drag & Drop files here").weak());
        });
        ui.add_space(4.0);
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Files (in merge order)").strong());

        egui::Grid::new("file_header")
            .num_columns(3)
            .min_col_width(60.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Order").strong());
                ui.label(egui::RichText::new("File Name").strong());
                ui.label(egui::RichText::new("Pages").strong());
                ui.end_row();
            });
        ui.separator();

        let mut clicked = None;
        let list_height = (ui.available_height() - 80.0).max(120.0);
        ScrollArea::vertical()
            .id_salt("file_list")
            .auto_shrink([false, false])
            .max_height(list_height)
            .show(ui, |ui| {
                let session = self.state.session();
                if session.is_empty() {
                    ui.label(egui::RichText::new("No files selected").weak());
                    return;
                }
                egui::Grid::new("file_rows")
                    .num_columns(3)
                    .min_col_width(60.0)
                    .striped(true)
                    .show(ui, |ui| {
                        for (index, entry) in session.entries().iter().enumerate() {
                            let selected = session.selected() == Some(index);
                            if ui.selectable_label(selected, (index + 1).to_string()).clicked() {
                                clicked = Some(index);
                            }
                            if ui
                                .selectable_label(selected, entry.name())
                                .on_hover_text(entry.path().display().to_string())
                                .clicked()
                            {
                                clicked = Some(index);
                            }
                            ui.label(entry.page_count().to_string());
                            ui.end_row();
                        }
                    });
            });
        if let Some(index) = clicked {
            self.state.select(index);
        }

        ui.add_space(4.0);
        let has_selection = self.state.session().selected().is_some();
        ui.horizontal(|ui| {
            if ui.add_enabled(has_selection, egui::Button::new("Move Up")).clicked() {
                self.state.move_up();
            }
            if ui.add_enabled(has_selection, egui::Button::new("Move Down")).clicked() {
                self.state.move_down();
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("Remove Selected"))
                .clicked()
            {
                self.state.remove_selected();
            }
        });

        let session = self.state.session();
        if !session.is_empty() {
            ui.label(
                egui::RichText::new(format!(
                    "{} file(s), {} pages",
                    session.len(),
                    session.total_pages()
                ))
                .weak(),
            );
        }
    }

    fn render_preview(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Preview").strong());
        ui.separator();
        ui.label(self.state.preview_caption());

        let selected = self
            .state
            .session()
            .selected_entry()
            .map(|entry| entry.path().to_path_buf());
        if let Some(path) = selected {
            if let Some(texture) = self.texture_for(ctx, &path) {
                ui.add_space(6.0);
                ui.vertical_centered(|ui| {
                    ui.add(
                        egui::Image::from_texture(SizedTexture::from_handle(&texture))
                            .shrink_to_fit(),
                    );
                });
            } else if matches!(
                self.state.session().selected_entry().map(|e| e.preview()),
                Some(Preview::Pending)
            ) {
                ui.spinner();
            }
        }
    }

    fn render_output(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Output File:");
            let field_width = (ui.available_width() - 80.0).max(120.0);
            ui.add(egui::TextEdit::singleline(self.state.output_mut()).desired_width(field_width));
            if ui.button("Browse").clicked()
                && let Some(path) = dialogs::save_output()
            {
                self.state.choose_output(path);
            }
        });

        ui.add_space(6.0);
        ui.vertical_centered(|ui| {
            let merge_button = egui::Button::new(egui::RichText::new("Merge PDF").size(16.0).strong())
                .min_size(egui::vec2(160.0, 36.0));
            if ui.add_enabled(!self.state.is_merging(), merge_button).clicked() {
                self.start_merge(ctx);
            }
        });

        if self.state.last_report().is_some() {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("Open PDF").clicked() {
                    self.state
                        .open_output_with(OpenTarget::File, |path| open::that(path));
                }
                if ui.button("Open Folder").clicked() {
                    self.state
                        .open_output_with(OpenTarget::Folder, |path| open::that(path));
                }
                if ui.button("Merge Again").clicked() {
                    self.state.reset_for_next_merge();
                    self.textures.clear();
                }
            });
        }
    }

    fn render_busy_dialog(&mut self, ctx: &egui::Context) {
        let MergeStatus::Running {
            dialog_visible: true,
            progress,
        } = self.state.merge_status()
        else {
            return;
        };

        let fraction = progress
            .as_ref()
            .map(|p| p.index as f32 / p.total.max(1) as f32)
            .unwrap_or(0.0);
        let mut cancel = false;
        egui::Window::new("Processing")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Merging PDFs, please wait...");
                ui.add(egui::ProgressBar::new(fraction).animate(true).show_percentage());
                ui.add_space(6.0);
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        if cancel {
            self.state.cancel_dialog();
        }
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.current_notice() else {
            return;
        };

        let color = match notice.level {
            NoticeLevel::Info => egui::Color32::from_rgb(46, 125, 50),
            NoticeLevel::Warning => egui::Color32::from_rgb(230, 126, 34),
            NoticeLevel::Error => egui::Color32::from_rgb(192, 57, 43),
        };
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .id(egui::Id::new("notice"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.colored_label(color, notice.message.as_str());
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.state.dismiss_notice();
        }
    }
}

impl eframe::App for MergerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.startup_files.is_empty() {
            let files = std::mem::take(&mut self.startup_files);
            self.add_files(ctx, files);
        }
        self.drain_events();
        self.handle_drop(ctx);

        let modal_open = self.state.current_notice().is_some();

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.state.status());
        });

        TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| self.render_header(ctx, ui));
        });

        TopBottomPanel::bottom("output").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| self.render_output(ctx, ui));
        });

        SidePanel::right("preview")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| self.render_preview(ctx, ui));

        CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| self.render_file_list(ui));
        });

        self.render_busy_dialog(ctx);
        self.render_notice(ctx);
    }
}
