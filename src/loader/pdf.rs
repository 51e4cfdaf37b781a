//! PDF pages rasterized through pdfium.
//!
//! The document bytes are kept in memory and each page is rendered on
//! request, so a page change only pays for the page it shows. PDFium is not
//! re-entrant; every call into it holds [`PDFIUM_LOCK`].

use super::{LoadError, LoadResult, LoadedPage, PageSource, PdfiumLoader};
use crate::profile_scope;
use crate::surface::fits_raster;
use crate::types::RasterFrame;
use image::RgbaImage;
use parking_lot::Mutex;
use pdfium_render::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Serializes all access to the PDFium library.
static PDFIUM_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` against a freshly opened document.
fn with_document<T>(
    bytes: &[u8],
    f: impl FnOnce(&PdfDocument<'_>) -> LoadResult<T>,
) -> LoadResult<T> {
    let _guard = PDFIUM_LOCK.lock();
    let pdfium = PdfiumLoader::load()?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| LoadError::DecodeFailure(format!("invalid PDF: {e:?}")))?;
    f(&document)
}

/// A PDF document rendered page by page at a fixed upscaling factor.
pub struct PdfSource {
    bytes: Arc<Vec<u8>>,
    page_count: u16,
    scale: f32,
}

impl PdfSource {
    /// Validate the document and read its page count.
    pub fn open(bytes: Vec<u8>, scale: f32) -> LoadResult<Self> {
        let page_count = with_document(&bytes, |document| Ok(document.pages().len()))?;
        if page_count == 0 {
            return Err(LoadError::DecodeFailure("PDF has no pages".to_string()));
        }
        debug!(page_count, scale, "pdf opened");
        Ok(Self {
            bytes: Arc::new(bytes),
            page_count,
            scale,
        })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> u16 {
        self.page_count
    }

    fn render_page(&self, page: u16) -> LoadResult<LoadedPage> {
        profile_scope!("pdf::render_page");
        if page == 0 || page > self.page_count {
            return Err(LoadError::MissingPage {
                page,
                total: self.page_count,
            });
        }

        let frame = with_document(&self.bytes, |document| {
            let pdf_page = document
                .pages()
                .get(page - 1)
                .map_err(|e| LoadError::Pdfium(format!("page {page}: {e:?}")))?;
            let width = (pdf_page.width().value * self.scale).ceil().max(0.0);
            let height = (pdf_page.height().value * self.scale).ceil().max(0.0);
            if !fits_raster(width as u32, height as u32) {
                return Err(LoadError::PageTooLarge {
                    width: width as u64,
                    height: height as u64,
                });
            }
            let config = PdfRenderConfig::new().scale_page_by_factor(self.scale);
            let bitmap = pdf_page
                .render_with_config(&config)
                .map_err(|e| LoadError::Pdfium(format!("render page {page}: {e:?}")))?;

            let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
            RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
                .map(RasterFrame::new)
                .ok_or_else(|| LoadError::Pdfium(format!("page {page}: short bitmap")))
        })?;

        debug!(page, width = frame.width(), height = frame.height(), "pdf page rendered");
        Ok(LoadedPage::from_frame(frame))
    }
}
