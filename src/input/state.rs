//! Input state machine - what the current pointer gesture is doing.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Stroking             (pointer down with draw/highlight tool)
//! Idle -> DraggingObject       (pointer down on a selectable object with select tool)
//! Idle -> Creating             (pointer down with rectangle/circle/textbox tool)
//!
//! Stroking -> Stroking         (pointer move appends a point)
//! DraggingObject -> DraggingObject (pointer move translates the object)
//!
//! Any -> Idle                  (pointer up finalizes, tool change discards)
//! ```

use crate::input::Brush;
use crate::types::{ObjectId, Tool};

/// A position in surface coordinates
pub type Point = (f32, f32);

/// Unified input state for pointer interactions.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress
    #[default]
    Idle,

    /// Capturing a freehand stroke
    Stroking {
        /// Captured points in order, starting with the pointer-down position
        points: Vec<Point>,
        /// Stroke parameters fixed at pointer down
        brush: Brush,
    },

    /// Moving an object with the select tool
    DraggingObject {
        id: ObjectId,
        /// Last pointer position, for delta calculation
        last: Point,
    },

    /// Waiting for pointer up to instantiate a shape or text box
    Creating {
        tool: Tool,
        start: Point,
    },
}

impl InputState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self, Self::Stroking { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::DraggingObject { .. })
    }

    pub fn is_creating(&self) -> bool {
        matches!(self, Self::Creating { .. })
    }

    /// Points captured so far, if a stroke is in progress
    pub fn stroke_points(&self) -> Option<&[Point]> {
        match self {
            Self::Stroking { points, .. } => Some(points),
            _ => None,
        }
    }

    /// The object being dragged, if any
    pub fn dragged_object(&self) -> Option<ObjectId> {
        match self {
            Self::DraggingObject { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn start_stroke(&mut self, at: Point, brush: Brush) {
        *self = Self::Stroking {
            points: vec![at],
            brush,
        };
    }

    /// Append a point to the stroke in progress. Ignored in other states.
    pub fn push_point(&mut self, at: Point) {
        if let Self::Stroking { points, .. } = self {
            points.push(at);
        }
    }

    pub fn start_dragging(&mut self, id: ObjectId, at: Point) {
        *self = Self::DraggingObject { id, last: at };
    }

    pub fn start_creating(&mut self, tool: Tool, at: Point) {
        *self = Self::Creating { tool, start: at };
    }

    /// Take the current state, leaving `Idle` behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
