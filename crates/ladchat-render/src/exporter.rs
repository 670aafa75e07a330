//! Composite export: flattens a saved edit into a new image file.
//!
//! Export never fails from the caller's point of view. Any error is logged
//! and the original media is returned with a warning instead.

use crate::raster::RasterRenderer;
use crate::renderer::{RenderContext, Renderer, RendererError};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use ladchat_core::{
    EXPORT_FALLBACK_WARNING, ExportOutcome, ExportRequest, MediaRef, MediaType, OutputFormat,
};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use thiserror::Error;
use uuid::Uuid;

/// Export errors. These are recovered inside the exporter.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
    #[error("Failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Export cancelled")]
    Cancelled,
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Outcome when nothing needs to be rendered, without touching the disk.
pub fn fast_path(request: &ExportRequest) -> Option<ExportOutcome> {
    let original = request.source.reference.clone();
    if !request.has_overlays() {
        return Some(ExportOutcome::unchanged(original));
    }
    if request.source.media_type == MediaType::Video {
        log::info!("Overlays are not baked into video; returning {}", original);
        return Some(ExportOutcome::unchanged(original));
    }
    None
}

/// Flattens photos with a renderer and writes the result.
pub struct CompositeExporter {
    renderer: Box<dyn Renderer>,
    cancel: Arc<AtomicBool>,
}

impl CompositeExporter {
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self {
            renderer,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a cancel flag with the caller.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Export the request. Always yields a usable media reference.
    pub fn export(&mut self, request: &ExportRequest) -> ExportOutcome {
        if let Some(outcome) = fast_path(request) {
            return outcome;
        }
        let original = request.source.reference.clone();
        match self.try_export(request) {
            Ok(media) => {
                log::info!("Exported edit to {}", media);
                ExportOutcome::baked(media)
            }
            Err(ExportError::Cancelled) => {
                log::info!("Export cancelled; keeping {}", original);
                ExportOutcome::unchanged(original)
            }
            Err(e) => {
                log::error!("Export failed, falling back to original: {}", e);
                ExportOutcome::fallback(original, EXPORT_FALLBACK_WARNING)
            }
        }
    }

    fn try_export(&mut self, request: &ExportRequest) -> ExportResult<MediaRef> {
        let config = &request.config;
        let path = request.source.reference.to_path();
        let base = image::open(&path)
            .map_err(|source| ExportError::Decode {
                path: path.clone(),
                source,
            })?
            .to_rgba8();

        let recipe = request.filter.map(|f| f.recipe());
        let ctx = RenderContext::new(&base, config.preview_rect().size())
            .with_scale_factor(config.export_scale)
            .with_filter(recipe)
            .with_drawings(&request.drawings)
            .with_captions(&request.captions);
        let flattened = self.renderer.flatten(&ctx)?;

        if self.cancel.load(Ordering::SeqCst) {
            return Err(ExportError::Cancelled);
        }

        let dir = config.output_dir();
        fs::create_dir_all(&dir)?;
        let out = dir.join(format!(
            "edited_{}.{}",
            Uuid::new_v4(),
            config.output_format.extension()
        ));
        write_image(&flattened, &out, config.output_format, config.jpeg_quality)?;
        Ok(MediaRef::from_path(out))
    }
}

fn write_image(
    image: &RgbaImage,
    path: &Path,
    format: OutputFormat,
    quality: u8,
) -> ExportResult<()> {
    match format {
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut writer = BufWriter::new(File::create(path)?);
            JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100))
                .encode_image(&rgb)
                .map_err(ExportError::Encode)?;
            writer.flush()?;
            Ok(())
        }
        OutputFormat::Png => image
            .save_with_format(path, ImageFormat::Png)
            .map_err(ExportError::Encode),
    }
}

/// Export running on a background thread.
///
/// Dropping the job detaches the thread; it finishes on its own.
pub struct ExportJob {
    handle: Option<JoinHandle<ExportOutcome>>,
    cancel: Arc<AtomicBool>,
    original: MediaRef,
}

impl ExportJob {
    /// Export with the software renderer built from the request's config.
    pub fn spawn(request: ExportRequest) -> Self {
        Self::spawn_inner(request, None)
    }

    /// Export with a specific renderer.
    pub fn spawn_with(request: ExportRequest, renderer: Box<dyn Renderer>) -> Self {
        Self::spawn_inner(request, Some(renderer))
    }

    fn spawn_inner(request: ExportRequest, renderer: Option<Box<dyn Renderer>>) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let original = request.source.reference.clone();
        let flag = Arc::clone(&cancel);

        let handle = std::thread::spawn(move || {
            if let Some(outcome) = fast_path(&request) {
                return outcome;
            }
            let renderer: Box<dyn Renderer> = match renderer {
                Some(renderer) => renderer,
                None => Box::new(RasterRenderer::from_config(&request.config)),
            };
            CompositeExporter::new(renderer)
                .with_cancel_flag(flag)
                .export(&request)
        });

        Self {
            handle: Some(handle),
            cancel,
            original,
        }
    }

    /// Ask the job to stop. A cancelled job writes nothing.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Block until the export is done.
    pub fn wait(mut self) -> ExportOutcome {
        let Some(handle) = self.handle.take() else {
            return ExportOutcome::unchanged(self.original);
        };
        match handle.join() {
            Ok(outcome) => outcome,
            Err(_) => {
                log::error!("Export thread panicked");
                ExportOutcome::fallback(self.original, EXPORT_FALLBACK_WARNING)
            }
        }
    }
}
