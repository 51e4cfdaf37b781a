//! Export handlers - flatten the open document into an artifact.

use super::Editor;
use crate::color::Color;
use crate::constants::CANVAS_BACKGROUND;
use crate::error::Result;
use crate::export::{
    ExportArtifact, ExportError, ExportFormat, ExportResult, PdfPage, assemble_pdf,
    default_file_name,
};
use crate::highlights::Highlight;
use crate::loader::SourceCategory;
use crate::notifications::Toast;
use crate::perf::{EXPORT_WARN_MS, ScopedTimer};
use crate::surface::raster;
use crate::types::Drawable;
use image::RgbaImage;
use tracing::info;

impl Editor {
    /// Export in the format matching the source.
    pub fn export_default(&mut self) -> Result<ExportArtifact> {
        let format = self
            .source_kind()
            .map(ExportFormat::for_source)
            .unwrap_or(ExportFormat::Png);
        self.export(format)
    }

    /// Flatten the open document.
    ///
    /// Raster formats flatten the shown page. PDF rebuilds every page with
    /// its annotations and highlights. Failures become a notice and leave
    /// the surface as it was.
    pub fn export(&mut self, format: ExportFormat) -> Result<ExportArtifact> {
        let _timer = ScopedTimer::new("editor::export", EXPORT_WARN_MS);
        match self.build_artifact(format) {
            Ok(artifact) => {
                info!(file = %artifact.file_name, bytes = artifact.len(), "export ready");
                self.toasts
                    .push(Toast::success(format!("Exported {}", artifact.file_name)));
                Ok(artifact)
            }
            Err(e) => Err(self.report(e.into())),
        }
    }

    fn build_artifact(&self, format: ExportFormat) -> ExportResult<ExportArtifact> {
        let (Some(handle), Some(kind)) = (self.state.surface(), self.source_kind()) else {
            return Err(ExportError::NothingToExport);
        };
        let quality = self.settings.jpeg_quality;
        let bytes = match format.raster() {
            Some(raster_format) => self.surfaces.to_raster(handle, raster_format, quality)?,
            None => assemble_pdf(&self.pdf_pages()?, quality)?,
        };
        Ok(ExportArtifact::new(bytes, format, default_file_name(kind, format)))
    }

    /// Every page of the document as an annotated raster.
    ///
    /// The shown page comes straight from the surface. Other pages are
    /// rendered again and get their stashed annotations and highlights.
    fn pdf_pages(&self) -> ExportResult<Vec<PdfPage>> {
        let (Some(handle), Some(source)) = (self.state.surface(), self.document.source.as_ref())
        else {
            return Err(ExportError::NothingToExport);
        };
        let scale = match source.kind().category() {
            SourceCategory::Pdf => self.settings.pdf_render_scale,
            _ => 1.0,
        };
        let base = Color::parse_or(CANVAS_BACKGROUND, Color::WHITE);

        let mut pages = Vec::with_capacity(usize::from(source.page_count()));
        for number in 1..=source.page_count().max(1) {
            let image = if number == self.document.shown_page {
                self.surfaces.get(handle)?.composite()?
            } else {
                let page = source.render_page(number)?;
                let stashed = self.pages.stashed(number);
                let foreground = if stashed.is_empty() {
                    page.overlays.as_slice()
                } else {
                    stashed
                };
                let highlights: Vec<_> = self
                    .document
                    .highlights
                    .for_page(number)
                    .map(Highlight::to_drawable)
                    .collect();
                let (width, height) = page.size;
                let background = Drawable::background(page.background, page.size);
                raster::composite(
                    width,
                    height,
                    base,
                    std::iter::once(&background)
                        .chain(foreground.iter())
                        .chain(highlights.iter()),
                )?
            };
            pages.push(PdfPage::from_render(image, scale));
        }
        Ok(pages)
    }

    /// The composited shown page, without encoding.
    pub fn snapshot(&self) -> Result<Option<RgbaImage>> {
        let Some(handle) = self.state.surface() else {
            return Ok(None);
        };
        Ok(Some(self.surfaces.get(handle)?.composite()?))
    }
}
