//! Editor lifecycle - construction, opening and clearing files.

use super::{AppState, DocumentState, Editor, SelectedFile};
use crate::background::BackgroundExecutor;
use crate::error::{Error, Result};
use crate::highlights::HighlightHistory;
use crate::input::ToolController;
use crate::loader::{ContentLoader, LoadError, SourceDocument, SourceKind};
use crate::notifications::{Toast, ToastManager};
use crate::pagination::PaginationController;
use crate::perf::{LOAD_WARN_MS, measure_and_log};
use crate::settings::Settings;
use crate::surface::{SurfaceRegistry, fits_raster};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};

impl Editor {
    pub fn new(settings: Settings) -> Self {
        Self::with_workers(settings, crate::constants::RENDER_WORKERS)
    }

    /// An editor whose page renders run on `workers` background threads.
    pub fn with_workers(settings: Settings, workers: usize) -> Self {
        Self {
            state: AppState::new(settings.default_color),
            surfaces: SurfaceRegistry::new(),
            tools: ToolController::new(),
            pages: PaginationController::new(1, settings.annotation_policy),
            document: DocumentState::default(),
            toasts: ToastManager::new(),
            loader: ContentLoader::new(settings.loader_config()),
            executor: BackgroundExecutor::new(workers),
            inbox: Arc::new(Mutex::new(Vec::new())),
            view_offset: (0.0, 0.0),
            settings,
        }
    }

    /// Route an error: user-facing ones become notices, the rest are logged
    /// as bugs. The error is handed back either way.
    pub(crate) fn report(&mut self, err: Error) -> Error {
        if err.is_user_facing() {
            self.toasts.push(Toast::error(err.to_string()));
        } else {
            error!("internal error: {err}");
        }
        err
    }

    /// Open a file from the upload boundary.
    ///
    /// The declared MIME type is checked before anything is decoded; an
    /// unsupported type or a decode failure leaves the current surface
    /// untouched and produces a notice.
    pub fn open_file(&mut self, name: &str, mime: &str, bytes: Vec<u8>) -> Result<()> {
        let kind = match SourceKind::from_mime(mime) {
            Ok(kind) => kind,
            Err(e) => {
                warn!(name, mime, "rejected upload");
                return Err(self.report(e.into()));
            }
        };
        let document = measure_and_log("editor::decode", LOAD_WARN_MS, || {
            self.loader.load(kind, bytes)
        });
        match document {
            Ok(document) => self.open_document(name, document),
            Err(e) => Err(self.report(e.into())),
        }
    }

    /// Show page 1 of an already decoded document on a fresh surface.
    pub fn open_document(&mut self, name: &str, document: SourceDocument) -> Result<()> {
        // Render before touching the surface so a failure changes nothing.
        let first = match document.render_page(1) {
            Ok(page) => page,
            Err(e) => return Err(self.report(e.into())),
        };
        let (width, height) = first.size;
        if !fits_raster(width, height) {
            let too_large = LoadError::PageTooLarge {
                width: width.into(),
                height: height.into(),
            };
            return Err(self.report(too_large.into()));
        }

        self.release_surface()?;
        let handle = self.surfaces.create_surface(width, height)?;
        self.state.set_surface(Some(handle));

        let total = document.page_count().max(1);
        self.pages.reset(total);
        self.document = DocumentState {
            source: Some(document.clone()),
            shown_page: 1,
            highlights: HighlightHistory::new(),
            highlight_objects: Vec::new(),
        };
        self.state.set_selected_file(Some(SelectedFile {
            name: name.to_string(),
            kind: document.kind(),
        }));
        self.state.set_total_pages(total);

        self.apply_page(1, first)?;
        info!(name, kind = %document.kind(), pages = total, "file opened");
        Ok(())
    }

    /// Close the open file and dispose its surface.
    pub fn clear_file(&mut self) -> Result<()> {
        self.release_surface()?;
        self.document = DocumentState::default();
        self.pages.reset(1);
        self.state.set_selected_file(None);
        self.state.set_total_pages(1);
        self.state.set_current_page(1);
        info!("file cleared");
        Ok(())
    }

    /// Dispose the live surface, if any. Runs before any new surface exists.
    fn release_surface(&mut self) -> Result<()> {
        self.tools.cancel();
        self.inbox.lock().clear();
        if let Some(handle) = self.state.surface() {
            self.state.set_surface(None);
            self.surfaces.dispose(handle)?;
        }
        Ok(())
    }

    /// Source kind of the open file
    pub fn source_kind(&self) -> Option<SourceKind> {
        self.document.source.as_ref().map(SourceDocument::kind)
    }

    /// Rasterize the live surface into its visible frame if it changed.
    pub fn render(&mut self) -> Result<bool> {
        let Some(handle) = self.state.surface() else {
            return Ok(false);
        };
        Ok(self.surfaces.render(handle)?)
    }
}
