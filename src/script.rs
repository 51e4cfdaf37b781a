//! Replayable editor actions.
//!
//! A script is a JSON array of actions, applied in order:
//!
//! ```json
//! [
//!   { "action": "set_tool", "tool": "draw" },
//!   { "action": "stroke", "points": [[0, 0], [10, 10], [20, 5]] },
//!   { "action": "jump_to", "page": 2 }
//! ]
//! ```

use crate::app::Editor;
use crate::color::Color;
use crate::error::Result;
use crate::input::Point;
use crate::types::Tool;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// How long a page change waits for its render when replayed
const PAGE_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// One editor action
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    SetTool { tool: Tool },
    SetColor { color: Color },
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// Down at the first point, move through the rest, up at the last
    Stroke { points: Vec<Point> },
    NextPage,
    PreviousPage,
    JumpTo { page: u16 },
    DeleteSelected,
    SetOpacity { opacity: f32 },
    SetTextBackground { color: Color },
    Highlight { from: Point, to: Point },
    UndoHighlight,
    RedoHighlight,
    Zoom { delta: f32 },
}

/// Parse a JSON script.
pub fn parse(json: &str) -> serde_json::Result<Vec<Action>> {
    serde_json::from_str(json)
}

impl Editor {
    /// Apply one action. Page changes wait for their render.
    pub fn apply(&mut self, action: &Action) -> Result<()> {
        debug!(?action, "applying action");
        match action {
            Action::SetTool { tool } => {
                self.set_tool(*tool);
            }
            Action::SetColor { color } => self.set_color(*color),
            Action::PointerDown { x, y } => {
                self.pointer_down((*x, *y))?;
            }
            Action::PointerMove { x, y } => {
                self.pointer_move((*x, *y))?;
            }
            Action::PointerUp { x, y } => {
                self.pointer_up((*x, *y))?;
            }
            Action::Stroke { points } => {
                let (Some(first), Some(last)) = (points.first(), points.last()) else {
                    return Ok(());
                };
                self.pointer_down(*first)?;
                for point in points.iter().skip(1) {
                    self.pointer_move(*point)?;
                }
                self.pointer_up(*last)?;
            }
            Action::NextPage => {
                self.next_page()?;
                self.wait_for_renders(PAGE_RENDER_TIMEOUT)?;
            }
            Action::PreviousPage => {
                self.previous_page()?;
                self.wait_for_renders(PAGE_RENDER_TIMEOUT)?;
            }
            Action::JumpTo { page } => {
                self.jump_to(*page)?;
                self.wait_for_renders(PAGE_RENDER_TIMEOUT)?;
            }
            Action::DeleteSelected => {
                self.delete_selected()?;
            }
            Action::SetOpacity { opacity } => {
                self.set_selected_opacity(*opacity)?;
            }
            Action::SetTextBackground { color } => {
                self.set_selected_text_background(*color)?;
            }
            Action::Highlight { from, to } => {
                self.highlight_selection(*from, *to)?;
            }
            Action::UndoHighlight => {
                self.undo_highlight()?;
            }
            Action::RedoHighlight => {
                self.redo_highlight()?;
            }
            Action::Zoom { delta } => {
                self.zoom_by(*delta);
            }
        }
        Ok(())
    }

    /// Apply actions in order, stopping at the first error.
    pub fn apply_all(&mut self, actions: &[Action]) -> Result<()> {
        for action in actions {
            self.apply(action)?;
        }
        Ok(())
    }
}
