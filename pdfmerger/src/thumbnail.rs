//! First-page previews.
//!
//! Rendering goes through the [`ThumbnailRenderer`] trait. The production
//! implementation, [`PdfiumRenderer`], rasterizes with the PDFium library on
//! a single thread that owns the only binding.
//! Previews are best effort: a failure only means the entry has no picture.

use futures::stream::{self, StreamExt};
use image::DynamicImage;
use pdfium_render::prelude::{PdfRenderConfig, Pdfium, PdfiumError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::thread;
use tokio::task;

use crate::config::ThumbnailSettings;
use crate::error::{PdfMergeError, Result};

/// An RGBA8 image of a document's first page.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA pixels, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl Thumbnail {
    /// Scale `image` down to fit a `max_size` square and convert to RGBA8.
    pub fn from_image(image: &DynamicImage, max_size: u32) -> Self {
        let scaled = if image.width() > max_size || image.height() > max_size {
            image.thumbnail(max_size, max_size)
        } else {
            image.clone()
        };
        let rgba = scaled.to_rgba8();

        Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        }
    }

    /// Width and height as `usize`, as image widgets expect them.
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Renders the first page of a PDF.
pub trait ThumbnailRenderer: Send + Sync {
    /// Render the first page of the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::ThumbnailFailed`] when the backend is missing
    /// or the page cannot be rendered.
    fn render_first_page(&self, path: &Path) -> Result<Thumbnail>;
}

/// A render request for the backend thread.
struct RenderJob {
    path: PathBuf,
    reply: mpsc::Sender<Result<Thumbnail>>,
}

/// One thread that owns a rendering backend and serves requests in order.
///
/// The backend is created on that thread and never leaves it, and renders
/// never overlap.
#[derive(Debug)]
struct RenderWorker {
    jobs: mpsc::Sender<RenderJob>,
}

impl RenderWorker {
    /// Start the thread, create the backend with `bind` and wait for it.
    ///
    /// The thread exits when the worker is dropped.
    fn spawn<T, B, R>(bind: B, render: R) -> Result<Self>
    where
        B: FnOnce() -> Result<T> + Send + 'static,
        R: Fn(&T, &Path) -> Result<Thumbnail> + Send + 'static,
    {
        let (jobs, queue) = mpsc::channel::<RenderJob>();
        let (ready_tx, ready_rx) = mpsc::channel();

        thread::Builder::new()
            .name("thumbnail-render".to_string())
            .spawn(move || {
                let backend = match bind() {
                    Ok(backend) => {
                        let _ = ready_tx.send(Ok(()));
                        backend
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                for job in queue {
                    let _ = job.reply.send(render(&backend, &job.path));
                }
                tracing::debug!("thumbnail render thread stopped");
            })
            .map_err(|e| PdfMergeError::other(format!("Failed to start render thread: {e}")))?;

        ready_rx
            .recv()
            .map_err(|_| PdfMergeError::other("Render thread exited during startup"))??;

        Ok(Self { jobs })
    }

    fn render(&self, path: &Path) -> Result<Thumbnail> {
        let stopped = || PdfMergeError::thumbnail_failed(path.to_path_buf(), "render thread stopped");
        let (reply, response) = mpsc::channel();

        self.jobs
            .send(RenderJob {
                path: path.to_path_buf(),
                reply,
            })
            .map_err(|_| stopped())?;
        response.recv().map_err(|_| stopped())?
    }
}

/// [`ThumbnailRenderer`] backed by PDFium.
///
/// PDFium is bound once, on a dedicated thread that performs every render.
/// The library is not re-entrant, so concurrent callers queue up behind it.
#[derive(Debug)]
pub struct PdfiumRenderer {
    worker: RenderWorker,
}

impl PdfiumRenderer {
    /// Bind PDFium and start the render thread.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::ThumbnailFailed`] when neither the configured
    /// directory, the executable's directory nor the system paths provide the
    /// library.
    pub fn start(settings: ThumbnailSettings) -> Result<Self> {
        let max_size = settings.max_size;
        let worker = RenderWorker::spawn(
            move || bind(&settings),
            move |pdfium: &Pdfium, path: &Path| render_page(pdfium, path, max_size),
        )?;
        tracing::info!("pdfium bound, previews enabled");

        Ok(Self { worker })
    }
}

impl ThumbnailRenderer for PdfiumRenderer {
    fn render_first_page(&self, path: &Path) -> Result<Thumbnail> {
        self.worker.render(path)
    }
}

fn bind(settings: &ThumbnailSettings) -> Result<Pdfium> {
    let dir = settings
        .library_dir
        .clone()
        .or_else(executable_dir)
        .unwrap_or_else(|| PathBuf::from("./"));

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| {
            PdfMergeError::thumbnail_failed(dir, format!("PDFium library unavailable: {e}"))
        })?;

    Ok(Pdfium::new(bindings))
}

fn render_page(pdfium: &Pdfium, path: &Path, max_size: u32) -> Result<Thumbnail> {
    let failed = |e: PdfiumError| PdfMergeError::thumbnail_failed(path.to_path_buf(), e.to_string());

    let document = pdfium.load_pdf_from_file(path, None).map_err(failed)?;
    let page = document.pages().get(0).map_err(failed)?;

    let oversample = max_size.saturating_mul(2) as i32;
    let render_config = PdfRenderConfig::new()
        .set_target_width(oversample)
        .set_maximum_height(oversample);
    let image = page
        .render_with_config(&render_config)
        .map_err(failed)?
        .as_image();

    let thumbnail = Thumbnail::from_image(&image, max_size);
    tracing::debug!(
        path = %path.display(),
        width = thumbnail.width,
        height = thumbnail.height,
        "rendered thumbnail"
    );
    Ok(thumbnail)
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Render previews for `paths` with at most `workers` renders in flight.
///
/// `on_ready` receives each path with its thumbnail (`None` on failure) as
/// soon as it finishes, so results arrive in completion order.
pub async fn render_thumbnails<R, F>(
    renderer: Arc<R>,
    paths: Vec<PathBuf>,
    workers: usize,
    mut on_ready: F,
) where
    R: ThumbnailRenderer + ?Sized + 'static,
    F: FnMut(PathBuf, Option<Thumbnail>),
{
    let mut results = stream::iter(paths)
        .map(|path| {
            let renderer = Arc::clone(&renderer);
            async move {
                let render_path = path.clone();
                let outcome =
                    task::spawn_blocking(move || renderer.render_first_page(&render_path)).await;
                (path, outcome)
            }
        })
        .buffer_unordered(workers.max(1));

    while let Some((path, outcome)) = results.next().await {
        let thumbnail = match outcome {
            Ok(Ok(thumbnail)) => Some(thumbnail),
            Ok(Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "no preview");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "preview task failed");
                None
            }
        };
        on_ready(path, thumbnail);
    }
}
