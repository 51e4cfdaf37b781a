//! Core types for the docmark annotation canvas.
//!
//! This module defines the annotation object model: drawables and their
//! attributes, the tool set, and the identifiers handed out by the surface.

use crate::color::Color;
use crate::constants::LINE_HEIGHT_FACTOR;
use crate::surface::text::wrap_lines;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a drawable, unique within its surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a surface owned by a [`crate::surface::SurfaceRegistry`].
///
/// Handles are never reused, so a handle to a disposed surface stays invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(pub u64);

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

// ============================================================================
// Raster frames
// ============================================================================

/// An immutable decoded raster (straight-alpha RGBA), cheap to clone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RasterFrame(Arc<RgbaImage>);

impl RasterFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// A frame filled with a single color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self::new(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba(color.to_rgba_u8()),
        ))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.0
    }
}

impl From<RgbaImage> for RasterFrame {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

// ============================================================================
// Drawables
// ============================================================================

/// Stroke end style for freehand strokes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// The payload of a drawable, one variant per kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawableKind {
    Rectangle {
        size: (f32, f32),
        fill: Color,
    },
    Circle {
        radius: f32,
        fill: Color,
    },
    TextBox {
        text: String,
        font_size: f32,
        /// Wrap width; text wider than this breaks onto new lines
        width: f32,
        color: Color,
        /// Background fill behind the text (text highlighting)
        background: Option<Color>,
        /// `text` wrapped at `width`; refreshed whenever either changes
        #[serde(skip)]
        lines: Vec<String>,
    },
    FreehandStroke {
        /// Points in surface coordinates, in capture order
        points: Vec<(f32, f32)>,
        color: Color,
        width: f32,
        cap: LineCap,
    },
    Image {
        /// Displayed size; the frame is scaled to fit it
        size: (f32, f32),
        #[serde(skip)]
        frame: RasterFrame,
    },
}

/// One visual entity on a surface.
///
/// `position` is the top-left corner for every kind except freehand strokes,
/// whose points are absolute and whose position is the bounding-box origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub position: (f32, f32),
    /// 0.0 (transparent) to 1.0 (opaque)
    pub opacity: f32,
    pub selectable: bool,
    #[serde(flatten)]
    pub kind: DrawableKind,
}

impl Drawable {
    pub fn new(position: (f32, f32), kind: DrawableKind) -> Self {
        let mut drawable = Self {
            position,
            opacity: 1.0,
            selectable: true,
            kind,
        };
        if let DrawableKind::FreehandStroke { points, .. } = &drawable.kind {
            drawable.position = stroke_bounds(points).0;
        }
        drawable
    }

    pub fn rectangle(position: (f32, f32), size: (f32, f32), fill: Color) -> Self {
        Self::new(position, DrawableKind::Rectangle { size, fill })
    }

    pub fn circle(position: (f32, f32), radius: f32, fill: Color) -> Self {
        Self::new(position, DrawableKind::Circle { radius, fill })
    }

    pub fn text_box(
        position: (f32, f32),
        text: impl Into<String>,
        font_size: f32,
        width: f32,
        color: Color,
    ) -> Self {
        let text = text.into();
        let lines = wrap_lines(&text, font_size, width);
        Self::new(
            position,
            DrawableKind::TextBox {
                text,
                font_size,
                width,
                color,
                background: None,
                lines,
            },
        )
    }

    pub fn stroke(points: Vec<(f32, f32)>, color: Color, width: f32, cap: LineCap) -> Self {
        Self::new(
            (0.0, 0.0),
            DrawableKind::FreehandStroke {
                points,
                color,
                width,
                cap,
            },
        )
    }

    pub fn image(position: (f32, f32), size: (f32, f32), frame: RasterFrame) -> Self {
        Self::new(position, DrawableKind::Image { size, frame })
    }

    /// A non-selectable image stretched over `size` from the origin.
    pub fn background(frame: RasterFrame, size: (u32, u32)) -> Self {
        let size = (size.0 as f32, size.1 as f32);
        Self {
            selectable: false,
            ..Self::image((0.0, 0.0), size, frame)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Bounding size in surface units.
    pub fn size(&self) -> (f32, f32) {
        match &self.kind {
            DrawableKind::Rectangle { size, .. } | DrawableKind::Image { size, .. } => *size,
            DrawableKind::Circle { radius, .. } => (radius * 2.0, radius * 2.0),
            DrawableKind::TextBox {
                font_size, width, ..
            } => {
                let lines = self.text_lines().map_or(0, |lines| lines.len()) as f32;
                (*width, lines * font_size * LINE_HEIGHT_FACTOR)
            }
            DrawableKind::FreehandStroke { points, width, .. } => {
                let (min, max) = stroke_bounds(points);
                ((max.0 - min.0).max(*width), (max.1 - min.1).max(*width))
            }
        }
    }

    /// The wrapped lines of a text box. Boxes that came out of
    /// deserialization have no cached layout and are wrapped on the fly.
    pub fn text_lines(&self) -> Option<Cow<'_, [String]>> {
        match &self.kind {
            DrawableKind::TextBox {
                text,
                font_size,
                width,
                lines,
                ..
            } => Some(if lines.is_empty() {
                Cow::Owned(wrap_lines(text, *font_size, *width))
            } else {
                Cow::Borrowed(lines.as_slice())
            }),
            _ => None,
        }
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let (w, h) = self.size();
        let (x, y) = self.position;
        (x, y, x + w, y + h)
    }

    /// Move by a delta. Stroke points move with the drawable.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position.0 += dx;
        self.position.1 += dy;
        if let DrawableKind::FreehandStroke { points, .. } = &mut self.kind {
            for point in points.iter_mut() {
                point.0 += dx;
                point.1 += dy;
            }
        }
    }

    /// Set the bounding size. Strokes are scaled about their origin.
    pub fn resize(&mut self, width: f32, height: f32) {
        let (old_w, old_h) = self.size();
        let origin = self.position;
        match &mut self.kind {
            DrawableKind::Rectangle { size, .. } | DrawableKind::Image { size, .. } => {
                *size = (width, height);
            }
            DrawableKind::Circle { radius, .. } => *radius = width.min(height) / 2.0,
            DrawableKind::TextBox {
                text,
                font_size,
                width: w,
                lines,
                ..
            } => {
                *w = width;
                *lines = wrap_lines(text, *font_size, width);
            }
            DrawableKind::FreehandStroke { points, .. } => {
                let sx = if old_w > 0.0 { width / old_w } else { 1.0 };
                let sy = if old_h > 0.0 { height / old_h } else { 1.0 };
                for point in points.iter_mut() {
                    point.0 = origin.0 + (point.0 - origin.0) * sx;
                    point.1 = origin.1 + (point.1 - origin.1) * sy;
                }
            }
        }
    }

    /// The color a tool assigned to this drawable, if it carries one.
    pub fn color(&self) -> Option<Color> {
        match &self.kind {
            DrawableKind::Rectangle { fill, .. } | DrawableKind::Circle { fill, .. } => Some(*fill),
            DrawableKind::TextBox { color, .. } | DrawableKind::FreehandStroke { color, .. } => {
                Some(*color)
            }
            DrawableKind::Image { .. } => None,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            DrawableKind::Rectangle { .. } => "Rectangle",
            DrawableKind::Circle { .. } => "Circle",
            DrawableKind::TextBox { .. } => "TextBox",
            DrawableKind::FreehandStroke { .. } => "FreehandStroke",
            DrawableKind::Image { .. } => "Image",
        }
    }
}

/// Min and max corners of a point cloud; the origin for an empty one.
fn stroke_bounds(points: &[(f32, f32)]) -> ((f32, f32), (f32, f32)) {
    let Some(first) = points.first() else {
        return ((0.0, 0.0), (0.0, 0.0));
    };
    points.iter().fold((*first, *first), |(min, max), p| {
        ((min.0.min(p.0), min.1.min(p.1)), (max.0.max(p.0), max.1.max(p.1)))
    })
}

// ============================================================================
// Tools
// ============================================================================

/// Tool types for the annotation toolbar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Rectangle,
    Circle,
    Textbox,
    Draw,
    Highlight,
    Image,
    None,
}

impl Tool {
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Textbox => "Textbox",
            Tool::Draw => "Draw",
            Tool::Highlight => "Highlighter",
            Tool::Image => "Image",
            Tool::None => "None",
        }
    }

    /// Tools that capture a continuous freehand stroke
    pub fn is_freehand(&self) -> bool {
        matches!(self, Tool::Draw | Tool::Highlight)
    }

    /// Tools that instantiate a drawable on a primary action
    pub fn creates_shape(&self) -> bool {
        matches!(self, Tool::Rectangle | Tool::Circle | Tool::Textbox)
    }

    pub fn all() -> &'static [Tool] {
        &[
            Tool::Select,
            Tool::Rectangle,
            Tool::Circle,
            Tool::Textbox,
            Tool::Draw,
            Tool::Highlight,
            Tool::Image,
            Tool::None,
        ]
    }
}
