//! Application state - the shared session store and the Editor struct.

use crate::background::BackgroundExecutor;
use crate::color::Color;
use crate::constants::DEFAULT_ZOOM;
use crate::highlights::HighlightHistory;
use crate::input::coords::clamp_zoom;
use crate::input::{Point, ToolController};
use crate::loader::{ContentLoader, LoadResult, LoadedPage, SourceDocument, SourceKind};
use crate::notifications::ToastManager;
use crate::pagination::{PaginationController, RenderTicket};
use crate::settings::Settings;
use crate::surface::SurfaceRegistry;
use crate::types::{ObjectId, SurfaceHandle, Tool};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// The file currently open
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub kind: SourceKind,
}

/// Session-wide state read by the UI layer.
///
/// Every field has exactly one setter and setters are the only way to
/// change it; there is no batching.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    active_tool: Tool,
    active_color: Color,
    selected_file: Option<SelectedFile>,
    surface: Option<SurfaceHandle>,
    current_page: u16,
    total_pages: u16,
    zoom: f32,
}

impl AppState {
    pub fn new(active_color: Color) -> Self {
        Self {
            active_tool: Tool::default(),
            active_color,
            selected_file: None,
            surface: None,
            current_page: 1,
            total_pages: 1,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn set_active_tool(&mut self, tool: Tool) {
        debug!(tool = tool.label(), "active tool");
        self.active_tool = tool;
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn set_active_color(&mut self, color: Color) {
        self.active_color = color;
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn set_selected_file(&mut self, file: Option<SelectedFile>) {
        self.selected_file = file;
    }

    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.surface
    }

    pub fn set_surface(&mut self, handle: Option<SurfaceHandle>) {
        self.surface = handle;
    }

    pub fn current_page(&self) -> u16 {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: u16) {
        self.current_page = page;
    }

    pub fn total_pages(&self) -> u16 {
        self.total_pages
    }

    pub fn set_total_pages(&mut self, total: u16) {
        self.total_pages = total;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = clamp_zoom(zoom);
    }
}

/// Finished page renders waiting to be applied on the editor thread
pub(crate) type RenderInbox = Arc<Mutex<Vec<(RenderTicket, LoadResult<LoadedPage>)>>>;

/// The open document and what was derived from it
#[derive(Default)]
pub struct DocumentState {
    pub source: Option<SourceDocument>,
    /// Page whose annotations are on the surface right now
    pub shown_page: u16,
    pub highlights: HighlightHistory,
    /// Surface objects currently standing in for highlights of the shown page
    pub highlight_objects: Vec<ObjectId>,
}

/// Main editor - composed of the state store and the components it drives
pub struct Editor {
    /// Shared session state
    pub state: AppState,
    pub surfaces: SurfaceRegistry,
    pub tools: ToolController,
    pub pages: PaginationController,
    pub document: DocumentState,
    pub toasts: ToastManager,
    pub settings: Settings,
    pub(crate) loader: ContentLoader,
    pub(crate) executor: BackgroundExecutor,
    pub(crate) inbox: RenderInbox,
    /// Screen position of the surface origin
    pub view_offset: Point,
}
