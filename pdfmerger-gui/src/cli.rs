//! CLI argument parsing for pdfmerger.
//!
//! This module defines the command-line interface structure using `clap`.
//! It is also compiled by the build script to render the man page, so it
//! depends on nothing but `clap` and `std`.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Select, reorder, preview and merge PDF files.
///
/// Without `--headless` a window opens with the given files already in the
/// list. With `--headless` the files are merged straight away.
#[derive(Parser, Debug)]
#[command(name = "pdfmerger")]
#[command(version)]
#[command(about = "Select, reorder, preview and merge PDF files", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Input PDF files to load (in order)
    ///
    /// Files, glob patterns or directories. Directories are searched
    /// recursively and only `.pdf` files are kept.
    ///
    /// Examples:
    ///   pdfmerger file1.pdf file2.pdf
    ///   pdfmerger --headless chapter*.pdf -o book.pdf
    #[arg(value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE", default_value = "merged.pdf")]
    pub output: PathBuf,

    /// Merge the inputs without opening a window
    #[arg(long)]
    pub headless: bool,

    /// Print the headless merge report as JSON
    #[arg(long, requires = "headless")]
    pub json: bool,

    /// Compression level for output PDF
    ///
    /// - none: Streams are written as read
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and drop unused objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Edge length of the preview thumbnails, in pixels
    #[arg(long, value_name = "PX", default_value_t = 240)]
    #[arg(value_parser = clap::value_parser!(u32).range(16..=2048))]
    pub thumbnail_size: u32,

    /// Do not render first-page previews
    #[arg(long)]
    pub no_thumbnails: bool,

    /// Directory containing the PDFium library
    ///
    /// Searched before the executable's directory and the system paths.
    #[arg(long, value_name = "DIR", env = "PDFMERGER_PDFIUM_DIR")]
    pub pdfium_dir: Option<PathBuf>,

    /// Number of preview requests kept in flight
    ///
    /// Pages are rasterized one at a time on the render thread; this bounds
    /// how many files wait in its queue. Default is number of CPU cores.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Default log level implied by `-v` and `-q`.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
