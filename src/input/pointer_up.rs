//! Pointer up handling - commit strokes, create shapes, finish drags.

use crate::constants::{
    CLICK_DRAG_THRESHOLD, DEFAULT_CIRCLE_RADIUS, DEFAULT_FONT_SIZE, DEFAULT_RECT_SIZE,
    DEFAULT_TEXTBOX_WIDTH, MIN_SHAPE_SIZE, MIN_TEXTBOX_WIDTH, TEXTBOX_PLACEHOLDER,
};
use crate::color::Color;
use crate::input::{InputState, Point, PointerContext, PointerOutcome, ToolController};
use crate::surface::SurfaceResult;
use crate::types::{Drawable, Tool};
use tracing::debug;

impl ToolController {
    pub fn pointer_up(
        &mut self,
        ctx: &mut PointerContext<'_>,
        at: Point,
    ) -> SurfaceResult<PointerOutcome> {
        match self.state.take() {
            InputState::Idle => Ok(PointerOutcome::Ignored),
            InputState::DraggingObject { id, last } => {
                if last != at {
                    ctx.surfaces
                        .move_object(ctx.handle, id, at.0 - last.0, at.1 - last.1)?;
                }
                Ok(PointerOutcome::Moved(id))
            }
            InputState::Stroking { mut points, brush } => {
                if points.last() != Some(&at) {
                    points.push(at);
                }
                if points.len() < 2 {
                    debug!("empty stroke discarded");
                    return Ok(PointerOutcome::StrokeDiscarded);
                }
                let stroke = Drawable::stroke(points, brush.color, brush.width, brush.cap);
                let id = ctx.surfaces.add_object(ctx.handle, stroke)?;
                Ok(PointerOutcome::StrokeCommitted(id))
            }
            InputState::Creating { tool, start } => {
                let Some(drawable) = shape_for_gesture(tool, start, at, ctx.color) else {
                    return Ok(PointerOutcome::Ignored);
                };
                let id = ctx.surfaces.add_object(ctx.handle, drawable)?;
                ctx.surfaces.set_active_object(ctx.handle, Some(id))?;
                debug!(tool = tool.label(), %id, "created object");
                Ok(PointerOutcome::Created(id))
            }
        }
    }
}

/// Build the drawable a creation gesture from `start` to `end` produces.
///
/// A click (movement under the drag threshold on both axes) gives the default
/// size at the pointer. A drag spans the gesture, never smaller than the
/// minimum shape size.
pub fn shape_for_gesture(tool: Tool, start: Point, end: Point, color: Color) -> Option<Drawable> {
    let dx = (end.0 - start.0).abs();
    let dy = (end.1 - start.1).abs();
    let is_click = dx < CLICK_DRAG_THRESHOLD && dy < CLICK_DRAG_THRESHOLD;

    let (position, size) = if is_click {
        let default = match tool {
            Tool::Circle => (DEFAULT_CIRCLE_RADIUS * 2.0, DEFAULT_CIRCLE_RADIUS * 2.0),
            Tool::Textbox => (DEFAULT_TEXTBOX_WIDTH, DEFAULT_FONT_SIZE),
            _ => DEFAULT_RECT_SIZE,
        };
        (start, default)
    } else {
        (
            (start.0.min(end.0), start.1.min(end.1)),
            (dx.max(MIN_SHAPE_SIZE), dy.max(MIN_SHAPE_SIZE)),
        )
    };

    match tool {
        Tool::Rectangle => Some(Drawable::rectangle(position, size, color)),
        Tool::Circle => Some(Drawable::circle(position, size.0.min(size.1) / 2.0, color)),
        Tool::Textbox => Some(Drawable::text_box(
            position,
            TEXTBOX_PLACEHOLDER,
            DEFAULT_FONT_SIZE,
            size.0.max(MIN_TEXTBOX_WIDTH),
            color,
        )),
        _ => None,
    }
}
