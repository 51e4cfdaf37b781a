//! Application module - the editor session and its operations.
//!
//! This module is organized into several submodules:
//! - `state` - The shared `AppState` store and the `Editor` struct
//! - `lifecycle` - Construction, opening and clearing files
//! - `tool_handlers` - Tool and color selection, pointer routing, edits of the selection
//! - `page_handlers` - Page navigation, background renders, PDF highlights
//! - `export_handlers` - Flattening the document into an artifact

mod export_handlers;
mod lifecycle;
mod page_handlers;
mod state;
mod tool_handlers;

pub use state::{AppState, DocumentState, Editor, SelectedFile};
