//! pdfmerger - Select, reorder, preview and merge PDF files.
//!
//! Opens the merger window, or merges straight from the command line with
//! `--headless`.

mod app;
mod cli;
mod config;
mod dialogs;
mod headless;
mod state;

use std::process;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use pdfmerger::session::Session;
use pdfmerger::thumbnail::{PdfiumRenderer, ThumbnailRenderer};
use pdfmerger::utils::collect_pdf_paths;
use tracing_subscriber::EnvFilter;

use crate::app::MergerApp;
use crate::cli::Cli;
use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let directive = format!("warn,pdfmerger={}", cli.log_level());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .init();

    let config = match AppConfig::try_from(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    };

    if config.headless {
        match headless::run(&config, cli.quiet).await {
            Ok(report) => println!("{}", headless::render_report(&report, config.json)),
            Err(err) => {
                eprintln!("Error: {err}");
                process::exit(err.exit_code());
            }
        }
        return;
    }

    if let Err(err) = run_gui(config) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run_gui(config: AppConfig) -> anyhow::Result<()> {
    let renderer: Option<Arc<dyn ThumbnailRenderer>> = match &config.merge.thumbnails {
        Some(settings) => match PdfiumRenderer::start(settings.clone()) {
            Ok(renderer) => Some(Arc::new(renderer) as Arc<dyn ThumbnailRenderer>),
            Err(err) => {
                tracing::warn!(error = %err, "previews disabled");
                None
            }
        },
        None => None,
    };

    let mut session = Session::with_output(config.merge.output.to_string_lossy());
    session.set_previews_enabled(renderer.is_some());

    let startup_files = match collect_pdf_paths(&config.inputs) {
        Ok(paths) => paths,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring command line inputs");
            Vec::new()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PDF Merger - Offline")
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([640.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let runtime = tokio::runtime::Handle::current();
    let merge_config = config.merge;
    eframe::run_native(
        "PDF Merger Offline",
        options,
        Box::new(move |cc| {
            Ok(Box::new(MergerApp::new(
                cc,
                AppState::new(session),
                merge_config,
                runtime,
                renderer,
                startup_files,
            )))
        }),
    )
    .map_err(|e| anyhow!("window failed: {e}"))
}
