//! Text highlights over PDF pages with undo/redo.
//!
//! History is kept as whole snapshots of the highlight list: every action
//! pushes the previous list onto the undo stack, and any new action clears
//! the redo stack.

use crate::color::Color;
use crate::constants::TEXT_HIGHLIGHT_COLOR;
use crate::types::Drawable;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A highlighted rectangle on one page, in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub page: u16,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Highlight {
    pub fn new(page: u16, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            page,
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized highlight spanning two corners.
    pub fn from_corners(page: u16, a: (f32, f32), b: (f32, f32)) -> Self {
        Self::new(
            page,
            a.0.min(b.0),
            a.1.min(b.1),
            (a.0 - b.0).abs(),
            (a.1 - b.1).abs(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// The translucent, non-selectable fill painted for this highlight.
    pub fn to_drawable(&self) -> Drawable {
        let fill = Color::parse_or(TEXT_HIGHLIGHT_COLOR, Color::rgba(255, 255, 0, 102));
        Drawable::rectangle((self.x, self.y), (self.width, self.height), fill).with_selectable(false)
    }
}

/// Highlights of one document plus their undo/redo history.
#[derive(Debug, Default, Clone)]
pub struct HighlightHistory {
    current: Vec<Highlight>,
    undo_stack: Vec<Vec<Highlight>>,
    redo_stack: Vec<Vec<Highlight>>,
}

impl HighlightHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a highlight. Empty rectangles are ignored.
    pub fn add(&mut self, highlight: Highlight) -> bool {
        if highlight.is_empty() {
            return false;
        }
        self.undo_stack.push(self.current.clone());
        self.current.push(highlight);
        self.redo_stack.clear();
        debug!(page = highlight.page, total = self.current.len(), "highlight added");
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.redo_stack.push(current);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.undo_stack.push(current);
        true
    }

    pub fn all(&self) -> &[Highlight] {
        &self.current
    }

    pub fn for_page(&self, page: u16) -> impl Iterator<Item = &Highlight> {
        self.current.iter().filter(move |h| h.page == page)
    }
}
