//! Tool controller - routes the active tool and color into surface mutations.

use crate::color::Color;
use crate::constants::{
    DRAW_BRUSH_WIDTH, HIGHLIGHT_BRUSH_COLOR, HIGHLIGHT_BRUSH_WIDTH,
};
use crate::input::InputState;
use crate::surface::SurfaceRegistry;
use crate::types::{LineCap, ObjectId, SurfaceHandle, Tool};
use tracing::debug;

/// Stroke parameters for freehand capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color,
    pub width: f32,
    pub cap: LineCap,
}

impl Brush {
    /// The pen: active color, width 3, round cap.
    pub fn draw(color: Color) -> Self {
        Self {
            color,
            width: DRAW_BRUSH_WIDTH,
            cap: LineCap::Round,
        }
    }

    /// The highlighter: translucent yellow, width 15, square cap.
    pub fn highlight() -> Self {
        Self {
            color: Color::parse_or(HIGHLIGHT_BRUSH_COLOR, Color::rgba(255, 255, 0, 128)),
            width: HIGHLIGHT_BRUSH_WIDTH,
            cap: LineCap::Square,
        }
    }

    /// The brush a freehand tool captures with, if `tool` is one.
    pub fn for_tool(tool: Tool, active_color: Color) -> Option<Self> {
        match tool {
            Tool::Draw => Some(Self::draw(active_color)),
            Tool::Highlight => Some(Self::highlight()),
            _ => None,
        }
    }
}

/// Everything a pointer event acts on.
pub struct PointerContext<'a> {
    pub surfaces: &'a mut SurfaceRegistry,
    pub handle: SurfaceHandle,
    pub tool: Tool,
    pub color: Color,
}

/// What a pointer event did to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Nothing changed
    Ignored,
    /// A gesture started; the surface is not modified until it finishes
    Started,
    /// The selection changed (select tool)
    Selected(Option<ObjectId>),
    /// A dragged object moved
    Moved(ObjectId),
    /// A shape or text box was created and selected
    Created(ObjectId),
    /// A freehand stroke was committed
    StrokeCommitted(ObjectId),
    /// A stroke ended with too few points and was dropped
    StrokeDiscarded,
}

/// Pointer-driven state machine for the annotation tools.
///
/// The active tool and color are owned by the application state and passed
/// in with each event; the controller only tracks the gesture in progress.
#[derive(Debug, Default)]
pub struct ToolController {
    pub(super) state: InputState,
}

impl ToolController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// React to a tool switch.
    ///
    /// Switching to the tool that is already active is a no-op. Otherwise any
    /// gesture in progress is abandoned, including an uncommitted stroke.
    /// Returns whether the tool actually changed.
    pub fn on_tool_changed(&mut self, previous: Tool, next: Tool) -> bool {
        if previous == next {
            return false;
        }
        if let Some(points) = self.state.stroke_points() {
            debug!(
                from = previous.label(),
                to = next.label(),
                points = points.len(),
                "discarding in-progress stroke"
            );
        }
        self.state.reset();
        true
    }

    /// Abandon any gesture, e.g. when the surface goes away.
    pub fn cancel(&mut self) {
        self.state.reset();
    }
}
