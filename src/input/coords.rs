//! Coordinate conversion between screen space and surface space.
//!
//! Zoom and pan only change how pointer positions map onto the surface;
//! drawables are always stored in surface coordinates.

use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::input::Point;

/// Context needed for coordinate conversions
#[derive(Debug, Clone, Copy)]
pub struct CoordinateContext {
    /// Screen position of the surface origin
    pub offset: Point,
    pub zoom: f32,
}

impl Default for CoordinateContext {
    fn default() -> Self {
        Self {
            offset: (0.0, 0.0),
            zoom: 1.0,
        }
    }
}

impl CoordinateContext {
    #[inline]
    pub fn new(offset: Point, zoom: f32) -> Self {
        Self { offset, zoom }
    }

    #[inline]
    pub fn screen_to_surface(&self, screen: Point) -> Point {
        (
            (screen.0 - self.offset.0) / self.zoom,
            (screen.1 - self.offset.1) / self.zoom,
        )
    }

    #[inline]
    pub fn surface_to_screen(&self, surface: Point) -> Point {
        (
            surface.0 * self.zoom + self.offset.0,
            surface.1 * self.zoom + self.offset.1,
        )
    }

    /// Convert a screen-space delta (for drag operations)
    #[inline]
    pub fn delta_to_surface(&self, delta: Point) -> Point {
        (delta.0 / self.zoom, delta.1 / self.zoom)
    }
}

/// Clamp a zoom factor to the supported range.
#[inline]
pub fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
