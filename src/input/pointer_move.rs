//! Pointer move handling - stroke capture and object dragging.

use crate::input::{InputState, Point, PointerContext, PointerOutcome, ToolController};
use crate::surface::SurfaceResult;

impl ToolController {
    pub fn pointer_move(
        &mut self,
        ctx: &mut PointerContext<'_>,
        at: Point,
    ) -> SurfaceResult<PointerOutcome> {
        match &mut self.state {
            InputState::Stroking { points, .. } => {
                points.push(at);
                Ok(PointerOutcome::Ignored)
            }
            InputState::DraggingObject { id, last } => {
                let (dx, dy) = (at.0 - last.0, at.1 - last.1);
                let id = *id;
                *last = at;
                if dx != 0.0 || dy != 0.0 {
                    ctx.surfaces.move_object(ctx.handle, id, dx, dy)?;
                }
                Ok(PointerOutcome::Moved(id))
            }
            InputState::Creating { .. } | InputState::Idle => Ok(PointerOutcome::Ignored),
        }
    }
}
