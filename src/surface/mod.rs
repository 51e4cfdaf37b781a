//! Drawing surface: a retained-mode scene of drawables over a background.
//!
//! The surface is split into:
//!
//! - `error` - `SurfaceError` and the `SurfaceResult` alias
//! - `raster` - compositing the scene into pixels with tiny-skia
//! - `text` - glyph outlines for text drawables
//!
//! ## Render model
//!
//! Every mutation is a pure model update that marks the surface dirty.
//! [`SurfaceRegistry::render`] is the only operation that touches the visible
//! frame; it rasterizes once and is a no-op until the next mutation, so
//! callers batch mutations and render once. [`SurfaceRegistry::to_raster`]
//! composites the model directly and does not depend on `render` having run.

mod error;
pub mod raster;
pub mod text;

pub use error::*;

use crate::color::Color;
use crate::constants::{CANVAS_BACKGROUND, MAX_PAGE_EXTENT, MAX_PAGE_PIXELS};
use crate::profile_scope;
use crate::spatial_index::SpatialIndex;
use crate::types::{Drawable, ObjectId, RasterFrame, SurfaceHandle};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Encoded raster formats a surface can be flattened to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
        }
    }
}

/// What happens to the annotation layer when the background is replaced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundPolicy {
    /// Drop every foreground drawable
    ClearForeground,
    /// Keep the foreground drawables as they are
    KeepForeground,
}

/// One drawing surface: a background plus drawables in z-order (back to front).
pub struct Surface {
    width: u32,
    height: u32,
    background: Option<Drawable>,
    objects: Vec<(ObjectId, Drawable)>,
    selected: Option<ObjectId>,
    next_object_id: u64,
    index: SpatialIndex,
    dirty: bool,
    visible: Option<RgbaImage>,
    render_count: u64,
    background_updates: u64,
}

impl Surface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            objects: Vec::new(),
            selected: None,
            next_object_id: 1,
            index: SpatialIndex::new(),
            dirty: true,
            visible: None,
            render_count: 0,
            background_updates: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn background(&self) -> Option<&Drawable> {
        self.background.as_ref()
    }

    /// Foreground drawables in z-order, back to front.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Drawable)> {
        self.objects.iter().map(|(id, d)| (*id, d))
    }

    pub fn object(&self, id: ObjectId) -> Option<&Drawable> {
        self.objects.iter().find(|(oid, _)| *oid == id).map(|(_, d)| d)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Whether the model changed since the last render
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The frame produced by the last render, if any
    pub fn visible(&self) -> Option<&RgbaImage> {
        self.visible.as_ref()
    }

    /// Number of times the visible frame was actually rasterized
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Number of times the background was set or replaced
    pub fn background_updates(&self) -> u64 {
        self.background_updates
    }

    fn position_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|(oid, _)| *oid == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut Drawable> {
        self.objects
            .iter_mut()
            .find(|(oid, _)| *oid == id)
            .map(|(_, d)| d)
    }

    fn reindex(&mut self, id: ObjectId) {
        if let Some(drawable) = self.object(id).filter(|d| d.selectable).cloned() {
            self.index.insert(id, &drawable);
        } else {
            self.index.remove(id);
        }
    }

    fn clear_foreground(&mut self) -> Vec<Drawable> {
        self.selected = None;
        self.index.clear();
        self.objects.drain(..).map(|(_, d)| d).collect()
    }

    /// Composite the model into pixels.
    pub fn composite(&self) -> SurfaceResult<RgbaImage> {
        let base = Color::parse_or(CANVAS_BACKGROUND, Color::WHITE);
        raster::composite(
            self.width,
            self.height,
            base,
            self.background.iter().chain(self.objects.iter().map(|(_, d)| d)),
        )
    }
}

/// Owner of every live surface, addressed by [`SurfaceHandle`].
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceHandle, Surface>,
    next_handle: u64,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_surface(&mut self, width: u32, height: u32) -> SurfaceResult<SurfaceHandle> {
        validate_dimensions(width, height)?;
        self.next_handle += 1;
        let handle = SurfaceHandle(self.next_handle);
        self.surfaces.insert(handle, Surface::new(width, height));
        info!(%handle, width, height, "surface created");
        Ok(handle)
    }

    /// Release a surface and every drawable on it. The handle stays invalid.
    pub fn dispose(&mut self, handle: SurfaceHandle) -> SurfaceResult<()> {
        let surface = self
            .surfaces
            .remove(&handle)
            .ok_or(SurfaceError::InvalidHandle(handle))?;
        info!(%handle, objects = surface.object_count(), "surface disposed");
        Ok(())
    }

    pub fn is_live(&self, handle: SurfaceHandle) -> bool {
        self.surfaces.contains_key(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn get(&self, handle: SurfaceHandle) -> SurfaceResult<&Surface> {
        self.surfaces
            .get(&handle)
            .ok_or(SurfaceError::InvalidHandle(handle))
    }

    fn get_mut(&mut self, handle: SurfaceHandle) -> SurfaceResult<&mut Surface> {
        self.surfaces
            .get_mut(&handle)
            .ok_or(SurfaceError::InvalidHandle(handle))
    }

    pub fn resize(&mut self, handle: SurfaceHandle, width: u32, height: u32) -> SurfaceResult<()> {
        let surface = self.get_mut(handle)?;
        validate_dimensions(width, height)?;
        surface.width = width;
        surface.height = height;
        surface.dirty = true;
        debug!(%handle, width, height, "surface resized");
        Ok(())
    }

    /// Install `frame` as the background, clearing or keeping the foreground.
    ///
    /// Returns the drawables removed from the foreground.
    pub fn set_background(
        &mut self,
        handle: SurfaceHandle,
        frame: RasterFrame,
        policy: BackgroundPolicy,
    ) -> SurfaceResult<Vec<Drawable>> {
        let surface = self.get_mut(handle)?;
        let removed = match policy {
            BackgroundPolicy::ClearForeground => surface.clear_foreground(),
            BackgroundPolicy::KeepForeground => Vec::new(),
        };
        let size = surface.dimensions();
        surface.background = Some(Drawable::background(frame, size));
        surface.background_updates += 1;
        surface.dirty = true;
        Ok(removed)
    }

    pub fn add_object(&mut self, handle: SurfaceHandle, drawable: Drawable) -> SurfaceResult<ObjectId> {
        let surface = self.get_mut(handle)?;
        let id = ObjectId(surface.next_object_id);
        surface.next_object_id += 1;
        if drawable.selectable {
            surface.index.insert(id, &drawable);
        }
        surface.objects.push((id, drawable));
        surface.dirty = true;
        Ok(id)
    }

    /// Remove a drawable; the surface keeps no reference to it afterwards.
    pub fn remove_object(&mut self, handle: SurfaceHandle, id: ObjectId) -> SurfaceResult<Drawable> {
        let surface = self.get_mut(handle)?;
        let pos = surface
            .position_of(id)
            .ok_or(SurfaceError::UnknownObject(id))?;
        let (_, drawable) = surface.objects.remove(pos);
        surface.index.remove(id);
        if surface.selected == Some(id) {
            surface.selected = None;
        }
        surface.dirty = true;
        Ok(drawable)
    }

    /// Remove every foreground drawable and return them in z-order.
    pub fn take_foreground(&mut self, handle: SurfaceHandle) -> SurfaceResult<Vec<Drawable>> {
        let surface = self.get_mut(handle)?;
        surface.dirty = true;
        Ok(surface.clear_foreground())
    }

    pub fn get_selected(&self, handle: SurfaceHandle) -> SurfaceResult<Option<ObjectId>> {
        Ok(self.get(handle)?.selected)
    }

    /// Make `id` the active object, or clear the selection with `None`.
    pub fn set_active_object(
        &mut self,
        handle: SurfaceHandle,
        id: Option<ObjectId>,
    ) -> SurfaceResult<()> {
        let surface = self.get_mut(handle)?;
        if let Some(id) = id {
            surface
                .position_of(id)
                .ok_or(SurfaceError::UnknownObject(id))?;
        }
        if surface.selected != id {
            surface.selected = id;
            surface.dirty = true;
        }
        Ok(())
    }

    /// Apply an in-place edit to one drawable and refresh its index entry.
    pub fn update_object(
        &mut self,
        handle: SurfaceHandle,
        id: ObjectId,
        edit: impl FnOnce(&mut Drawable),
    ) -> SurfaceResult<()> {
        let surface = self.get_mut(handle)?;
        let drawable = surface
            .object_mut(id)
            .ok_or(SurfaceError::UnknownObject(id))?;
        edit(drawable);
        surface.reindex(id);
        surface.dirty = true;
        Ok(())
    }

    pub fn move_object(
        &mut self,
        handle: SurfaceHandle,
        id: ObjectId,
        dx: f32,
        dy: f32,
    ) -> SurfaceResult<()> {
        self.update_object(handle, id, |d| d.translate(dx, dy))
    }

    pub fn resize_object(
        &mut self,
        handle: SurfaceHandle,
        id: ObjectId,
        width: f32,
        height: f32,
    ) -> SurfaceResult<()> {
        if width <= 0.0 || height <= 0.0 {
            return Err(SurfaceError::InvalidDimensions {
                width: width.max(0.0) as u32,
                height: height.max(0.0) as u32,
            });
        }
        self.update_object(handle, id, |d| d.resize(width, height))
    }

    /// Topmost selectable drawable under a point.
    pub fn object_at(&self, handle: SurfaceHandle, x: f32, y: f32) -> SurfaceResult<Option<ObjectId>> {
        let surface = self.get(handle)?;
        let hits = surface.index.query_point(x, y);
        Ok(surface
            .objects
            .iter()
            .rev()
            .map(|(id, _)| *id)
            .find(|id| hits.contains(id)))
    }

    /// Rasterize the model into the visible frame if anything changed.
    ///
    /// Returns whether a rasterization happened.
    pub fn render(&mut self, handle: SurfaceHandle) -> SurfaceResult<bool> {
        let surface = self.get_mut(handle)?;
        if !surface.dirty && surface.visible.is_some() {
            return Ok(false);
        }
        profile_scope!("surface::render");
        surface.visible = Some(surface.composite()?);
        surface.dirty = false;
        surface.render_count += 1;
        Ok(true)
    }

    /// Flatten the current model to encoded bytes.
    pub fn to_raster(
        &self,
        handle: SurfaceHandle,
        format: RasterFormat,
        jpeg_quality: u8,
    ) -> SurfaceResult<Vec<u8>> {
        let surface = self.get(handle)?;
        raster::encode(&surface.composite()?, format, jpeg_quality)
    }
}

/// Whether a `width` x `height` raster stays within the page limits.
pub fn fits_raster(width: u32, height: u32) -> bool {
    width > 0
        && height > 0
        && width <= MAX_PAGE_EXTENT
        && height <= MAX_PAGE_EXTENT
        && u64::from(width) * u64::from(height) <= MAX_PAGE_PIXELS
}

pub(crate) fn validate_dimensions(width: u32, height: u32) -> SurfaceResult<()> {
    if !fits_raster(width, height) {
        return Err(SurfaceError::InvalidDimensions { width, height });
    }
    Ok(())
}
