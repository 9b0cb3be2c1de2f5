//! Page thumbnail rendering.
//!
//! Rasterization is delegated to PDFium through `pdfium-render`. The library
//! is bound at runtime; when it cannot be found the application falls back to
//! [`NullRenderer`] and shows pages without previews.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

use crate::{PdfCollateError, Result};

/// Longest edge, in pixels, of a stored thumbnail.
pub const MAX_THUMBNAIL_EDGE: u32 = 256;

/// A rendered page preview.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    image: RgbaImage,
}

impl Thumbnail {
    /// Wrap an RGBA image, shrinking it so neither edge exceeds
    /// [`MAX_THUMBNAIL_EDGE`].
    pub fn new(image: RgbaImage) -> Self {
        if image.width() <= MAX_THUMBNAIL_EDGE && image.height() <= MAX_THUMBNAIL_EDGE {
            return Self { image };
        }
        Self {
            image: fit_image(&image, MAX_THUMBNAIL_EDGE, MAX_THUMBNAIL_EDGE),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The underlying image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Scale the preview down to fit a `width` x `height` box, keeping the
    /// aspect ratio.
    pub fn fit(&self, width: u32, height: u32) -> RgbaImage {
        fit_image(&self.image, width, height)
    }
}

fn fit_image(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(0, 0);
    }

    let ratio = f64::min(
        f64::from(width) / f64::from(image.width()),
        f64::from(height) / f64::from(image.height()),
    );
    let w = ((f64::from(image.width()) * ratio).round() as u32).clamp(1, width);
    let h = ((f64::from(image.height()) * ratio).round() as u32).clamp(1, height);
    image::imageops::thumbnail(image, w, h)
}

/// Turns one page of a PDF file into a thumbnail.
///
/// Implementations keep no per-document state; every call opens the file.
pub trait ThumbnailRenderer: Send + Sync {
    /// Render page `page_index` (zero-based) of `path`.
    fn render(&self, path: &Path, page_index: usize) -> Result<Thumbnail>;

    /// Whether this renderer can produce thumbnails at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Renderer used when PDFium is not available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl ThumbnailRenderer for NullRenderer {
    fn render(&self, path: &Path, page_index: usize) -> Result<Thumbnail> {
        Err(PdfCollateError::Render {
            path: path.to_path_buf(),
            page_index,
            reason: "no renderer available".to_string(),
        })
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// PDFium-backed renderer.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
    scale: f32,
}

impl std::fmt::Debug for PdfiumRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumRenderer")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl PdfiumRenderer {
    /// Bind to the PDFium library, looking in the directory of the running
    /// executable first and then in the system library path.
    ///
    /// `scale` is the number of pixels per PDF point.
    pub fn bind(scale: f32) -> Result<Self> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("./"));
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&exe_dir))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| PdfCollateError::other(format!("Failed to bind PDFium: {e}")))?;

        debug!(scale, "Bound PDFium renderer");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            scale,
        })
    }

    fn render_error(path: &Path, page_index: usize, err: impl std::fmt::Display) -> PdfCollateError {
        PdfCollateError::Render {
            path: PathBuf::from(path),
            page_index,
            reason: err.to_string(),
        }
    }
}

impl ThumbnailRenderer for PdfiumRenderer {
    fn render(&self, path: &Path, page_index: usize) -> Result<Thumbnail> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Self::render_error(path, page_index, e))?;

        let index = u16::try_from(page_index)
            .map_err(|_| Self::render_error(path, page_index, "page index out of range"))?;
        let page = document
            .pages()
            .get(index)
            .map_err(|e| Self::render_error(path, page_index, e))?;

        let edge = MAX_THUMBNAIL_EDGE as i32;
        let width = ((page.width().value * self.scale).round() as i32).clamp(1, edge);
        let config = PdfRenderConfig::new()
            .set_target_width(width)
            .set_maximum_width(edge)
            .set_maximum_height(edge);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| Self::render_error(path, page_index, e))?;

        let image = RgbaImage::from_raw(
            bitmap.width().max(0) as u32,
            bitmap.height().max(0) as u32,
            bitmap.as_rgba_bytes(),
        )
        .ok_or_else(|| Self::render_error(path, page_index, "bitmap size mismatch"))?;

        Ok(Thumbnail::new(image))
    }
}

/// Bind the best available renderer.
///
/// Falls back to [`NullRenderer`] with a warning when PDFium cannot be
/// loaded, so the application still works without previews.
pub fn bind_renderer(scale: f32) -> Arc<dyn ThumbnailRenderer> {
    match PdfiumRenderer::bind(scale) {
        Ok(renderer) => Arc::new(renderer),
        Err(err) => {
            warn!(error = %err, "Thumbnails disabled");
            Arc::new(NullRenderer)
        }
    }
}
