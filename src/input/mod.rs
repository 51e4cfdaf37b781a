//! Pointer input handling for the annotation surface.
//!
//! This module turns pointer events into surface mutations according to the
//! active tool: selecting and dragging objects, creating shapes and text
//! boxes, and capturing freehand strokes.
//!
//! ## Architecture
//!
//! The input system uses an explicit state machine (`InputState`) to track
//! the gesture in progress. The active tool and color are not stored here;
//! they arrive with each event through `PointerContext`.
//!
//! ## Modules
//!
//! - `state` - Input state machine enum and helper methods
//! - `controller` - `ToolController`, brushes, tool switching
//! - `pointer_down` - Pointer down handling (selection, gesture start)
//! - `pointer_move` - Pointer move handling (stroke capture, dragging)
//! - `pointer_up` - Pointer up handling (commit strokes, create shapes)
//! - `coords` - Screen/surface coordinate conversion under zoom

pub mod coords;
mod controller;
mod pointer_down;
mod pointer_move;
mod pointer_up;
mod state;

pub use controller::{Brush, PointerContext, PointerOutcome, ToolController};
pub use pointer_up::shape_for_gesture;
pub use state::{InputState, Point};
