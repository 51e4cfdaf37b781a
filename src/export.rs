//! Export: flatten an annotated document into a downloadable artifact.
//!
//! Raster sources (images, spreadsheets, Word and Outlook text) are
//! flattened to PNG or JPEG. PDF sources are rebuilt as a new PDF whose pages
//! are the annotated page rasters, embedded as JPEG images at the original
//! page size; the original PDF byte stream is never edited.

use crate::constants::PDF_POINTS_PER_INCH;
use crate::loader::{LoadError, SourceCategory, SourceKind};
use crate::profile_scope;
use crate::surface::{RasterFormat, SurfaceError, raster};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;
use lopdf::{Document, Object, Stream, dictionary};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while producing an export artifact
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("failed to encode export: {0}")]
    Encode(String),

    #[error("failed to build PDF: {0}")]
    Pdf(String),

    #[error("failed to render page for export: {0}")]
    Load(#[from] LoadError),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("nothing to export, no file is open")]
    NothingToExport,
}

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
}

impl ExportFormat {
    /// The format matching the source where feasible: JPEG stays JPEG, PDF
    /// stays PDF, everything else becomes PNG.
    pub fn for_source(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Jpeg => ExportFormat::Jpeg,
            SourceKind::Pdf => ExportFormat::Pdf,
            _ => ExportFormat::Png,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// The raster encoding of this format, `None` for PDF.
    pub fn raster(&self) -> Option<RasterFormat> {
        match self {
            ExportFormat::Png => Some(RasterFormat::Png),
            ExportFormat::Jpeg => Some(RasterFormat::Jpeg),
            ExportFormat::Pdf => None,
        }
    }
}

/// Fixed download name per source category.
pub fn default_file_name(kind: SourceKind, format: ExportFormat) -> String {
    let stem = match kind.category() {
        SourceCategory::Image => "annotated-image",
        SourceCategory::Pdf | SourceCategory::Word => "annotated-document",
        SourceCategory::Spreadsheet => "annotated-sheet",
        SourceCategory::Outlook => "annotated-message",
    };
    format!("{stem}.{}", format.extension())
}

/// Encoded export bytes plus how to offer them for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub file_name: String,
}

impl ExportArtifact {
    pub fn new(bytes: Vec<u8>, format: ExportFormat, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: format.mime(),
            file_name: file_name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:` URL for handing the artifact to a browser-style save action.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }

    /// Write the artifact into `dir` under its file name.
    ///
    /// The bytes go to a temporary file first and are moved into place, so a
    /// failed write never leaves a truncated file behind.
    pub fn save_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        self.save_as(&dir.join(&self.file_name))
    }

    /// Write the artifact to an explicit path, atomically.
    pub fn save_as(&self, path: &Path) -> ExportResult<PathBuf> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&self.bytes)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "export saved");
        Ok(path.to_path_buf())
    }
}

/// One annotated page headed for a rebuilt PDF.
#[derive(Clone, Debug)]
pub struct PdfPage {
    pub image: RgbaImage,
    /// Page size in PDF points
    pub size_pt: (f32, f32),
}

impl PdfPage {
    /// A page whose raster was rendered at `scale` points-to-pixels.
    pub fn from_render(image: RgbaImage, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let size_pt = (image.width() as f32 / scale, image.height() as f32 / scale);
        Self { image, size_pt }
    }

    /// A page sized from a raster at a given pixel density.
    pub fn from_dpi(image: RgbaImage, dpi: f32) -> Self {
        Self::from_render(image, dpi / PDF_POINTS_PER_INCH)
    }
}

/// Build a PDF with one page per raster, each page showing its image full-bleed.
pub fn assemble_pdf(pages: &[PdfPage], jpeg_quality: u8) -> ExportResult<Vec<u8>> {
    profile_scope!("export::assemble_pdf");
    if pages.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());

    for (i, page) in pages.iter().enumerate() {
        let (img_w, img_h) = page.image.dimensions();
        let jpeg = raster::encode(&page.image, RasterFormat::Jpeg, jpeg_quality)?;
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => img_w as i64,
                "Height" => img_h as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let (w, h) = page.size_pt;
        let content = format!("q {w:.3} 0 0 {h:.3} 0 0 cm /Im0 Do Q");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), w.into(), h.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        debug!(page = i + 1, width = img_w, height = img_h, "pdf page embedded");
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buffer)
}
