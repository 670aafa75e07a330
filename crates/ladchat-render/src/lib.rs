//! LadChat Render Library
//!
//! Flattens captions, drawings and filter tints onto captured photos.
//! The default implementation is a CPU rasterizer built on tiny-skia.

pub mod blend;
mod exporter;
mod raster;
mod renderer;
pub mod text;

pub use exporter::{CompositeExporter, ExportError, ExportJob, ExportResult, fast_path};
pub use raster::RasterRenderer;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use text::CaptionFont;
