//! Tool handlers - tool/color selection, pointer routing and edits of the
//! selected object.

use super::Editor;
use crate::color::Color;
use crate::constants::INSERTED_IMAGE_WIDTH;
use crate::error::Result;
use crate::input::coords::CoordinateContext;
use crate::input::{Point, PointerContext, PointerOutcome};
use crate::loader::image::decode_frame;
use crate::types::{Drawable, DrawableKind, ObjectId, SurfaceHandle, Tool};
use tracing::debug;

/// Which pointer event is being routed
#[derive(Clone, Copy)]
enum PointerPhase {
    Down,
    Move,
    Up,
}

impl Editor {
    /// Switch the active tool. Re-selecting the active tool changes nothing;
    /// switching away abandons any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) -> bool {
        let previous = self.state.active_tool();
        if !self.tools.on_tool_changed(previous, tool) {
            return false;
        }
        self.state.set_active_tool(tool);
        true
    }

    /// Change the active color. Existing drawables keep their colors.
    pub fn set_color(&mut self, color: Color) {
        self.state.set_active_color(color);
    }

    /// Screen/surface mapping under the current zoom.
    pub(crate) fn coordinates(&self) -> CoordinateContext {
        CoordinateContext::new(self.view_offset, self.state.zoom())
    }

    fn route_pointer(&mut self, phase: PointerPhase, screen: Point) -> Result<PointerOutcome> {
        let Some(handle) = self.state.surface() else {
            return Ok(PointerOutcome::Ignored);
        };
        let at = self.coordinates().screen_to_surface(screen);
        let mut ctx = PointerContext {
            surfaces: &mut self.surfaces,
            handle,
            tool: self.state.active_tool(),
            color: self.state.active_color(),
        };
        let outcome = match phase {
            PointerPhase::Down => self.tools.pointer_down(&mut ctx, at),
            PointerPhase::Move => self.tools.pointer_move(&mut ctx, at),
            PointerPhase::Up => self.tools.pointer_up(&mut ctx, at),
        };
        outcome.map_err(|e| self.report(e.into()))
    }

    /// Pointer pressed at a screen position.
    pub fn pointer_down(&mut self, screen: Point) -> Result<PointerOutcome> {
        self.route_pointer(PointerPhase::Down, screen)
    }

    pub fn pointer_move(&mut self, screen: Point) -> Result<PointerOutcome> {
        self.route_pointer(PointerPhase::Move, screen)
    }

    pub fn pointer_up(&mut self, screen: Point) -> Result<PointerOutcome> {
        self.route_pointer(PointerPhase::Up, screen)
    }

    fn selection(&self) -> Result<Option<(SurfaceHandle, ObjectId)>> {
        let Some(handle) = self.state.surface() else {
            return Ok(None);
        };
        Ok(self.surfaces.get_selected(handle)?.map(|id| (handle, id)))
    }

    /// Remove the selected object. Returns whether something was removed.
    pub fn delete_selected(&mut self) -> Result<bool> {
        let Some((handle, id)) = self.selection()? else {
            return Ok(false);
        };
        let removed = self.surfaces.remove_object(handle, id)?;
        debug!(%id, kind = removed.kind_label(), "deleted selected object");
        Ok(true)
    }

    /// Set the opacity of the selected object, clamped to [0, 1].
    pub fn set_selected_opacity(&mut self, opacity: f32) -> Result<bool> {
        let Some((handle, id)) = self.selection()? else {
            return Ok(false);
        };
        let opacity = opacity.clamp(0.0, 1.0);
        self.surfaces
            .update_object(handle, id, |d| d.opacity = opacity)?;
        Ok(true)
    }

    /// Put a background fill behind the selected text box.
    ///
    /// Returns false when nothing is selected or the selection is not text.
    pub fn set_selected_text_background(&mut self, color: Color) -> Result<bool> {
        let Some((handle, id)) = self.selection()? else {
            return Ok(false);
        };
        let is_text = self
            .surfaces
            .get(handle)?
            .object(id)
            .is_some_and(|d| matches!(d.kind, DrawableKind::TextBox { .. }));
        if !is_text {
            return Ok(false);
        }
        self.surfaces.update_object(handle, id, |d| {
            if let DrawableKind::TextBox { background, .. } = &mut d.kind {
                *background = Some(color);
            }
        })?;
        Ok(true)
    }

    /// Decode an image and place it at the origin, scaled to a fixed width.
    pub fn insert_image(&mut self, bytes: &[u8]) -> Result<Option<ObjectId>> {
        let Some(handle) = self.state.surface() else {
            return Ok(None);
        };
        let frame = decode_frame(bytes).map_err(|e| self.report(e.into()))?;
        let (w, h) = frame.dimensions();
        if w == 0 || h == 0 {
            return Ok(None);
        }
        let scale = INSERTED_IMAGE_WIDTH / w as f32;
        let drawable = Drawable::image((0.0, 0.0), (INSERTED_IMAGE_WIDTH, h as f32 * scale), frame);
        let id = self.surfaces.add_object(handle, drawable)?;
        self.surfaces.set_active_object(handle, Some(id))?;
        debug!(%id, width = w, height = h, "image inserted");
        Ok(Some(id))
    }

    /// Change the zoom by `delta`; returns the clamped zoom factor.
    pub fn zoom_by(&mut self, delta: f32) -> f32 {
        self.state.set_zoom(self.state.zoom() + delta);
        self.state.zoom()
    }
}
