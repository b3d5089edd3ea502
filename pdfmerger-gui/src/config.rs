//! Application settings derived from the command line.

use std::path::PathBuf;
use std::str::FromStr;

use pdfmerger::config::{CompressionLevel, Config, ThumbnailSettings};
use pdfmerger::error::PdfMergeError;

use crate::cli::Cli;

/// Everything the binary needs after argument parsing.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Library configuration.
    pub merge: Config,

    /// Inputs as given on the command line, not yet expanded.
    pub inputs: Vec<PathBuf>,

    /// Merge without a window.
    pub headless: bool,

    /// Print the headless report as JSON.
    pub json: bool,
}

impl TryFrom<&Cli> for AppConfig {
    type Error = PdfMergeError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let compression = CompressionLevel::from_str(&cli.compression)?;

        let thumbnails = (!cli.no_thumbnails).then(|| ThumbnailSettings {
            max_size: cli.thumbnail_size,
            library_dir: cli.pdfium_dir.clone(),
        });

        let merge = Config {
            output: cli.output.clone(),
            compression,
            thumbnails,
            jobs: cli.jobs,
            ..Config::default()
        };
        merge.validate()?;

        Ok(Self {
            merge,
            inputs: cli.inputs.clone(),
            headless: cli.headless,
            json: cli.json,
        })
    }
}
