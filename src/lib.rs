//! docmark - a document viewer and annotation canvas.
//!
//! Open an image, PDF, spreadsheet, Word document or Outlook message, draw
//! shapes, text and freehand strokes over it, and export the result.
//!
//! - `app` - the `Editor` session tying everything together
//! - `surface` - drawables over a background, rasterized on demand
//! - `input` - the pointer-driven tool state machine
//! - `loader` - decoding source files into pages
//! - `pagination` - page cursor and last-wins render sequencing
//! - `export` - PNG/JPEG flattening and PDF reassembly

pub mod app;
pub mod background;
pub mod color;
pub mod constants;
pub mod error;
pub mod export;
pub mod highlights;
pub mod input;
pub mod loader;
pub mod notifications;
pub mod pagination;
pub mod perf;
pub mod script;
pub mod settings;
pub mod spatial_index;
pub mod surface;
pub mod types;

pub use app::{AppState, Editor};
pub use error::{Error, Result};
