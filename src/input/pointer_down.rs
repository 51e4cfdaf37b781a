//! Pointer down handling - selection, drag start, stroke and shape start.

use crate::input::{Brush, Point, PointerContext, PointerOutcome, ToolController};
use crate::surface::SurfaceResult;
use crate::types::Tool;

impl ToolController {
    pub fn pointer_down(
        &mut self,
        ctx: &mut PointerContext<'_>,
        at: Point,
    ) -> SurfaceResult<PointerOutcome> {
        // A stray down without an up leaves a gesture behind; start over.
        self.state.reset();

        match ctx.tool {
            Tool::Select => {
                let hit = ctx.surfaces.object_at(ctx.handle, at.0, at.1)?;
                ctx.surfaces.set_active_object(ctx.handle, hit)?;
                if let Some(id) = hit {
                    self.state.start_dragging(id, at);
                }
                Ok(PointerOutcome::Selected(hit))
            }
            Tool::Rectangle | Tool::Circle | Tool::Textbox => {
                // Validate the handle now so a dead surface fails at the first event.
                ctx.surfaces.get(ctx.handle)?;
                self.state.start_creating(ctx.tool, at);
                Ok(PointerOutcome::Started)
            }
            Tool::Draw | Tool::Highlight => {
                ctx.surfaces.get(ctx.handle)?;
                let Some(brush) = Brush::for_tool(ctx.tool, ctx.color) else {
                    return Ok(PointerOutcome::Ignored);
                };
                self.state.start_stroke(at, brush);
                Ok(PointerOutcome::Started)
            }
            Tool::Image | Tool::None => Ok(PointerOutcome::Ignored),
        }
    }
}
