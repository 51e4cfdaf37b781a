//! PDFium library loader with platform-specific search paths.
//!
//! Centralizes the logic for locating the PDFium dynamic library across
//! development checkouts, installed binaries and system installs.

use super::{LoadError, LoadResult};
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable naming a directory that holds the PDFium library
pub const PDFIUM_DIR_ENV: &str = "DOCMARK_PDFIUM_DIR";

pub struct PdfiumLoader;

impl PdfiumLoader {
    /// Load the PDFium library from known search paths or the system library.
    ///
    /// Search order:
    /// 1. `$DOCMARK_PDFIUM_DIR`
    /// 2. `lib/` in the current working directory (development)
    /// 3. The executable's directory and its `lib/`
    /// 4. System library fallback
    pub fn load() -> LoadResult<Pdfium> {
        for dir in Self::search_dirs() {
            let path = Pdfium::pdfium_platform_library_name_at_path(&dir);
            if path.exists() {
                match Pdfium::bind_to_library(&path) {
                    Ok(bindings) => return Ok(Pdfium::new(bindings)),
                    Err(e) => debug!(path = %path.display(), "pdfium bind failed: {e:?}"),
                }
            }
        }
        Pdfium::bind_to_system_library()
            .map(Pdfium::new)
            .map_err(|e| LoadError::Pdfium(format!("Failed to load pdfium: {e:?}")))
    }

    fn search_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        if let Some(dir) = std::env::var_os(PDFIUM_DIR_ENV) {
            dirs.push(PathBuf::from(dir));
        }

        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd.join("lib"));
        }

        if let Ok(exe) = std::env::current_exe() {
            if let Some(parent) = exe.parent() {
                dirs.push(parent.to_path_buf());
                dirs.push(parent.join("lib"));
            }
        }

        dirs
    }
}
