//! User settings persisted as JSON.
//!
//! Stored at `<config dir>/docmark/settings.json`. A missing or unreadable
//! file is never fatal: [`Settings::load`] falls back to the defaults.

use crate::color::Color;
use crate::constants::{
    DEFAULT_ACTIVE_COLOR, DEFAULT_CANVAS_SIZE, DEFAULT_JPEG_QUALITY, MAX_CANVAS_SIZE,
    PDF_RENDER_SCALE,
};
use crate::loader::{LoaderConfig, SheetPaging, TableLayout};
use crate::pagination::AnnotationPolicy;
use crate::surface::fits_raster;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no config directory on this platform")]
    NoConfigDir,
}

pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Largest image background; bigger images are scaled down to fit
    pub max_canvas_size: (u32, u32),
    /// Surface size before a file is loaded, and page size for text documents
    pub default_canvas_size: (u32, u32),
    pub pdf_render_scale: f32,
    pub annotation_policy: AnnotationPolicy,
    pub default_color: Color,
    pub table_layout: TableLayout,
    pub jpeg_quality: u8,
    pub sheet_paging: SheetPaging,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_canvas_size: MAX_CANVAS_SIZE,
            default_canvas_size: DEFAULT_CANVAS_SIZE,
            pdf_render_scale: PDF_RENDER_SCALE,
            annotation_policy: AnnotationPolicy::default(),
            default_color: Color::parse_or(DEFAULT_ACTIVE_COLOR, Color::BLACK),
            table_layout: TableLayout::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            sheet_paging: SheetPaging::default(),
        }
    }
}

impl Settings {
    /// Default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docmark").join("settings.json"))
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), "ignoring unreadable settings: {e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings.sanitized())
    }

    pub fn save(&self) -> SettingsResult<()> {
        let path = Self::default_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Write atomically: a crash mid-save leaves the previous file intact.
    pub fn save_to(&self, path: &Path) -> SettingsResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Clamp values that would make the editor unusable.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !fits_raster(self.max_canvas_size.0, self.max_canvas_size.1) {
            self.max_canvas_size = defaults.max_canvas_size;
        }
        if !fits_raster(self.default_canvas_size.0, self.default_canvas_size.1) {
            self.default_canvas_size = defaults.default_canvas_size;
        }
        if !(self.pdf_render_scale.is_finite() && self.pdf_render_scale > 0.0) {
            self.pdf_render_scale = defaults.pdf_render_scale;
        }
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self.table_layout = self.table_layout.sanitized();
        self
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            max_canvas_size: self.max_canvas_size,
            default_canvas_size: self.default_canvas_size,
            pdf_render_scale: self.pdf_render_scale,
            table_layout: self.table_layout.clone(),
            sheet_paging: self.sheet_paging,
        }
    }
}
