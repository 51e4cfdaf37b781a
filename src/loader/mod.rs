//! Content loading: decode a source file into base-layer pages.
//!
//! One decoder per source category:
//!
//! - `image` - PNG/JPEG, scaled down to fit the canvas footprint
//! - `pdf` - pages rasterized on demand through pdfium
//! - `spreadsheet` - XLS/XLSX cells laid out as text drawables
//! - `word` - DOC/DOCX raw text as one text drawable
//! - `outlook` - MSG subject and body as one text drawable
//!
//! Every decoder produces a [`SourceDocument`]: a page count plus a way to
//! produce any page as a [`LoadedPage`] (background frame, surface size and
//! the editable drawables that sit on top of it).

mod error;
pub mod image;
pub mod outlook;
pub mod pdf;
mod pdfium_loader;
pub mod spreadsheet;
pub mod word;

pub use error::*;
pub use pdfium_loader::PdfiumLoader;
pub use spreadsheet::{SheetPaging, TableLayout};

use crate::color::Color;
use crate::constants::{
    CANVAS_BACKGROUND, DEFAULT_CANVAS_SIZE, DOCUMENT_FONT_SIZE, DOCUMENT_TEXT_COLOR,
    DOCUMENT_TEXT_ORIGIN, MAX_CANVAS_SIZE, MAX_INPUT_SIZE_MB, PDF_RENDER_SCALE,
};
use crate::profile_scope;
use crate::surface::fits_raster;
use crate::types::{Drawable, RasterFrame};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// Source kinds
// ============================================================================

/// Accepted source file types, keyed by declared MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Png,
    Jpeg,
    Pdf,
    Doc,
    Docx,
    Xls,
    Xlsx,
    Msg,
}

/// The viewer family a source kind belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    Image,
    Pdf,
    Spreadsheet,
    Word,
    Outlook,
}

impl SourceKind {
    /// Map a declared MIME type onto a source kind.
    pub fn from_mime(mime: &str) -> LoadResult<Self> {
        let kind = match mime.trim().to_ascii_lowercase().as_str() {
            "application/pdf" => SourceKind::Pdf,
            "image/png" => SourceKind::Png,
            "image/jpeg" => SourceKind::Jpeg,
            "application/msword" => SourceKind::Doc,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                SourceKind::Docx
            }
            "application/vnd.ms-excel" => SourceKind::Xls,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                SourceKind::Xlsx
            }
            "application/vnd.ms-outlook" => SourceKind::Msg,
            _ => return Err(LoadError::UnsupportedFileType(mime.to_string())),
        };
        Ok(kind)
    }

    /// Guess a source kind from a file extension (command line convenience).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let kind = match ext.as_str() {
            "pdf" => SourceKind::Pdf,
            "png" => SourceKind::Png,
            "jpg" | "jpeg" => SourceKind::Jpeg,
            "doc" => SourceKind::Doc,
            "docx" => SourceKind::Docx,
            "xls" => SourceKind::Xls,
            "xlsx" => SourceKind::Xlsx,
            "msg" => SourceKind::Msg,
            _ => return Err(LoadError::UnsupportedFileType(path.display().to_string())),
        };
        Ok(kind)
    }

    pub fn mime(&self) -> &'static str {
        match self {
            SourceKind::Png => "image/png",
            SourceKind::Jpeg => "image/jpeg",
            SourceKind::Pdf => "application/pdf",
            SourceKind::Doc => "application/msword",
            SourceKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            SourceKind::Xls => "application/vnd.ms-excel",
            SourceKind::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            SourceKind::Msg => "application/vnd.ms-outlook",
        }
    }

    pub fn category(&self) -> SourceCategory {
        match self {
            SourceKind::Png | SourceKind::Jpeg => SourceCategory::Image,
            SourceKind::Pdf => SourceCategory::Pdf,
            SourceKind::Doc | SourceKind::Docx => SourceCategory::Word,
            SourceKind::Xls | SourceKind::Xlsx => SourceCategory::Spreadsheet,
            SourceKind::Msg => SourceCategory::Outlook,
        }
    }

    pub fn all() -> &'static [SourceKind] {
        &[
            SourceKind::Png,
            SourceKind::Jpeg,
            SourceKind::Pdf,
            SourceKind::Doc,
            SourceKind::Docx,
            SourceKind::Xls,
            SourceKind::Xlsx,
            SourceKind::Msg,
        ]
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

// ============================================================================
// Pages
// ============================================================================

/// One decoded page: what goes onto the surface when the page is shown.
#[derive(Clone, Debug)]
pub struct LoadedPage {
    /// Surface size for this page
    pub size: (u32, u32),
    /// Non-interactive base layer
    pub background: RasterFrame,
    /// Editable drawables synthesized from the source (table cells, text)
    pub overlays: Vec<Drawable>,
}

impl LoadedPage {
    pub fn from_frame(frame: RasterFrame) -> Self {
        Self {
            size: frame.dimensions(),
            background: frame,
            overlays: Vec::new(),
        }
    }

    /// A blank page of `size` carrying `overlays`.
    ///
    /// The background is a single pixel; the surface stretches it over the
    /// whole page, so tall pages cost nothing until they are drawn.
    pub fn blank(size: (u32, u32), overlays: Vec<Drawable>) -> Self {
        let fill = Color::parse_or(CANVAS_BACKGROUND, Color::WHITE);
        Self {
            size,
            background: RasterFrame::solid(1, 1, fill),
            overlays,
        }
    }
}

/// A paginated source. Pages are numbered from 1.
///
/// Implementations must be shareable with background render workers.
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> u16;

    fn render_page(&self, page: u16) -> LoadResult<LoadedPage>;
}

/// Pages decoded up front.
pub struct StaticPages(Vec<LoadedPage>);

impl StaticPages {
    pub fn new(pages: Vec<LoadedPage>) -> Self {
        Self(pages)
    }
}

impl PageSource for StaticPages {
    fn page_count(&self) -> u16 {
        u16::try_from(self.0.len()).unwrap_or(u16::MAX)
    }

    fn render_page(&self, page: u16) -> LoadResult<LoadedPage> {
        page.checked_sub(1)
            .and_then(|i| self.0.get(usize::from(i)))
            .cloned()
            .ok_or(LoadError::MissingPage {
                page,
                total: self.page_count(),
            })
    }
}

/// A decoded source file. Immutable once produced.
#[derive(Clone)]
pub struct SourceDocument {
    kind: SourceKind,
    pages: Arc<dyn PageSource>,
}

impl SourceDocument {
    pub fn new(kind: SourceKind, pages: Arc<dyn PageSource>) -> Self {
        Self { kind, pages }
    }

    pub fn single(kind: SourceKind, page: LoadedPage) -> Self {
        Self::new(kind, Arc::new(StaticPages::new(vec![page])))
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn page_count(&self) -> u16 {
        self.pages.page_count()
    }

    pub fn render_page(&self, page: u16) -> LoadResult<LoadedPage> {
        self.pages.render_page(page)
    }

    /// Shared handle to the page source, for rendering off the main thread.
    pub fn pages(&self) -> Arc<dyn PageSource> {
        Arc::clone(&self.pages)
    }
}

impl fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDocument")
            .field("kind", &self.kind)
            .field("pages", &self.page_count())
            .finish()
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Tunables for the decoders, usually derived from [`crate::settings::Settings`].
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Largest image background; bigger images are scaled down
    pub max_canvas_size: (u32, u32),
    /// Page size for synthesized text documents
    pub default_canvas_size: (u32, u32),
    pub pdf_render_scale: f32,
    pub table_layout: TableLayout,
    pub sheet_paging: SheetPaging,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_canvas_size: MAX_CANVAS_SIZE,
            default_canvas_size: DEFAULT_CANVAS_SIZE,
            pdf_render_scale: PDF_RENDER_SCALE,
            table_layout: TableLayout::default(),
            sheet_paging: SheetPaging::default(),
        }
    }
}

/// Dispatches source bytes to the decoder for their kind.
#[derive(Clone, Debug, Default)]
pub struct ContentLoader {
    config: LoaderConfig,
}

impl ContentLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Decode `bytes` as `kind`.
    pub fn load(&self, kind: SourceKind, bytes: Vec<u8>) -> LoadResult<SourceDocument> {
        profile_scope!("loader::load");
        let size_mb = bytes.len() / (1024 * 1024);
        if size_mb > MAX_INPUT_SIZE_MB {
            return Err(LoadError::TooLarge {
                size_mb,
                max_mb: MAX_INPUT_SIZE_MB,
            });
        }
        debug!(%kind, bytes = bytes.len(), "decoding source");

        let document = match kind.category() {
            SourceCategory::Image => SourceDocument::single(
                kind,
                image::load_image(&bytes, self.config.max_canvas_size)?,
            ),
            SourceCategory::Pdf => {
                let source = pdf::PdfSource::open(bytes, self.config.pdf_render_scale)?;
                SourceDocument::new(kind, Arc::new(source))
            }
            SourceCategory::Spreadsheet => {
                let pages = spreadsheet::load_workbook(
                    bytes,
                    &self.config.table_layout,
                    self.config.sheet_paging,
                    self.config.default_canvas_size,
                )?;
                SourceDocument::new(kind, Arc::new(StaticPages::new(pages)))
            }
            SourceCategory::Word => {
                let text = match kind {
                    SourceKind::Doc => word::extract_doc_text(&bytes)?,
                    _ => word::extract_docx_text(&bytes)?,
                };
                SourceDocument::single(kind, self.text_page(text)?)
            }
            SourceCategory::Outlook => {
                let message = outlook::read_message(&bytes)?;
                SourceDocument::single(kind, self.text_page(message.display_text())?)
            }
        };

        info!(%kind, pages = document.page_count(), "source decoded");
        Ok(document)
    }

    /// A white page with `text` as one editable text drawable.
    ///
    /// The page grows downward when the wrapped text is taller than the
    /// default canvas, up to the raster limits.
    pub fn text_page(&self, text: String) -> LoadResult<LoadedPage> {
        let (width, height) = self.config.default_canvas_size;
        let (x, y) = DOCUMENT_TEXT_ORIGIN;
        let text_width = (width as f32 - 2.0 * x).max(1.0);
        let color = Color::parse_or(DOCUMENT_TEXT_COLOR, Color::BLACK);
        let drawable = Drawable::text_box((x, y), text, DOCUMENT_FONT_SIZE, text_width, color);

        let needed = (drawable.bounds().3 + y).ceil();
        let height = (height as f32).max(needed);
        if !fits_raster(width, height as u32) {
            return Err(LoadError::PageTooLarge {
                width: u64::from(width),
                height: height as u64,
            });
        }
        Ok(LoadedPage::blank((width, height as u32), vec![drawable]))
    }
}
