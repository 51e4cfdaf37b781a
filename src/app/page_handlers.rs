//! Page handlers - navigation, background page renders and PDF highlights.
//!
//! Page changes only move the cursor and queue a render. The render runs on
//! the background executor; its result lands in the editor's inbox and is
//! applied by [`Editor::process_background`], which drops any result whose
//! ticket is no longer the latest.

use super::Editor;
use crate::error::Result;
use crate::highlights::Highlight;
use crate::input::Point;
use crate::loader::{LoadError, LoadedPage, SourceCategory};
use crate::notifications::Toast;
use crate::pagination::RenderTicket;
use crate::perf::{LOAD_WARN_MS, measure_and_log};
use crate::surface::BackgroundPolicy;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

impl Editor {
    /// Go to the next page. No-op on the last page.
    pub fn next_page(&mut self) -> Result<bool> {
        let ticket = self.pages.next();
        Ok(self.navigate(ticket))
    }

    /// Go to the previous page. No-op on the first page.
    pub fn previous_page(&mut self) -> Result<bool> {
        let ticket = self.pages.previous();
        Ok(self.navigate(ticket))
    }

    /// Jump to `page`. Out-of-range pages fail and leave the cursor alone.
    pub fn jump_to(&mut self, page: u16) -> Result<bool> {
        match self.pages.jump_to(page) {
            Ok(ticket) => Ok(self.navigate(ticket)),
            Err(e) => Err(self.report(e.into())),
        }
    }

    fn navigate(&mut self, ticket: Option<RenderTicket>) -> bool {
        let Some(ticket) = ticket else {
            return false;
        };
        self.state.set_current_page(ticket.page);
        self.request_render(ticket);
        true
    }

    /// Queue a background render for `ticket`.
    pub(crate) fn request_render(&mut self, ticket: RenderTicket) {
        let Some(source) = self.document.source.as_ref() else {
            return;
        };
        let pages = source.pages();
        let inbox = Arc::clone(&self.inbox);
        self.executor.spawn(
            "render-page",
            move || {
                Ok(measure_and_log("page::render", LOAD_WARN_MS, || {
                    pages.render_page(ticket.page)
                }))
            },
            move |result| {
                let result = result.unwrap_or_else(|e| Err(LoadError::DecodeFailure(e)));
                inbox.lock().push((ticket, result));
            },
        );
    }

    /// Apply finished page renders. Returns how many were applied.
    ///
    /// Only the render matching the latest request is applied; results of
    /// superseded requests are discarded whatever order they arrive in.
    pub fn process_background(&mut self) -> Result<usize> {
        self.executor.process_results();
        let finished: Vec<_> = self.inbox.lock().drain(..).collect();

        let mut applied = 0;
        for (ticket, result) in finished {
            match result {
                Ok(page) => {
                    if self.pages.complete(ticket) {
                        self.apply_page(ticket.page, page)?;
                        applied += 1;
                    }
                }
                Err(e) => {
                    let current = self.pages.is_current(ticket);
                    self.pages.fail(ticket, &e.to_string());
                    if current {
                        self.toasts
                            .push(Toast::error(format!("Page {} failed to render: {e}", ticket.page)));
                    }
                }
            }
        }
        Ok(applied)
    }

    /// Block until no render is outstanding or `timeout` passes.
    pub fn wait_for_renders(&mut self, timeout: Duration) -> Result<usize> {
        let start = Instant::now();
        let mut applied = 0;
        loop {
            applied += self.process_background()?;
            if !self.executor.has_pending() && self.inbox.lock().is_empty() {
                break;
            }
            if start.elapsed() >= timeout {
                warn!(pending = self.executor.pending_count(), "timed out waiting for page renders");
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        Ok(applied)
    }

    /// Replace the surface content with `page`.
    ///
    /// The foreground of the page being left is handed to the annotation
    /// policy; the new page gets its stashed annotations back if it has any,
    /// otherwise the drawables synthesized by the loader.
    pub(crate) fn apply_page(&mut self, number: u16, page: LoadedPage) -> Result<()> {
        let Some(handle) = self.state.surface() else {
            return Ok(());
        };
        self.clear_highlight_objects()?;
        self.tools.cancel();

        let (width, height) = page.size;
        self.surfaces.resize(handle, width, height)?;
        let previous = self
            .surfaces
            .set_background(handle, page.background, BackgroundPolicy::ClearForeground)?;
        // Re-applying the page already shown keeps its foreground.
        let restored = if self.document.shown_page == number {
            previous
        } else {
            self.pages.stash(self.document.shown_page, previous);
            self.pages.restore(number)
        };
        let foreground = if restored.is_empty() {
            page.overlays
        } else {
            restored
        };
        for drawable in foreground {
            self.surfaces.add_object(handle, drawable)?;
        }

        self.document.shown_page = number;
        self.state.set_current_page(number);
        self.sync_highlight_objects()?;
        debug!(page = number, width, height, "page applied");
        Ok(())
    }

    // ========================================================================
    // PDF text highlights
    // ========================================================================

    fn is_pdf(&self) -> bool {
        self.source_kind()
            .is_some_and(|kind| kind.category() == SourceCategory::Pdf)
    }

    /// Highlight the region between two screen points on the current page.
    ///
    /// Only PDF documents carry highlights. Returns whether one was added.
    pub fn highlight_selection(&mut self, from: Point, to: Point) -> Result<bool> {
        if !self.is_pdf() {
            return Ok(false);
        }
        let coords = self.coordinates();
        let highlight = Highlight::from_corners(
            self.document.shown_page,
            coords.screen_to_surface(from),
            coords.screen_to_surface(to),
        );
        if !self.document.highlights.add(highlight) {
            return Ok(false);
        }
        self.refresh_highlights()?;
        Ok(true)
    }

    pub fn undo_highlight(&mut self) -> Result<bool> {
        if !self.document.highlights.undo() {
            return Ok(false);
        }
        self.refresh_highlights()?;
        Ok(true)
    }

    pub fn redo_highlight(&mut self) -> Result<bool> {
        if !self.document.highlights.redo() {
            return Ok(false);
        }
        self.refresh_highlights()?;
        Ok(true)
    }

    fn refresh_highlights(&mut self) -> Result<()> {
        self.clear_highlight_objects()?;
        self.sync_highlight_objects()
    }

    fn clear_highlight_objects(&mut self) -> Result<()> {
        let Some(handle) = self.state.surface() else {
            self.document.highlight_objects.clear();
            return Ok(());
        };
        for id in std::mem::take(&mut self.document.highlight_objects) {
            // The object may already be gone with a cleared foreground.
            if self.surfaces.get(handle)?.object(id).is_some() {
                self.surfaces.remove_object(handle, id)?;
            }
        }
        Ok(())
    }

    fn sync_highlight_objects(&mut self) -> Result<()> {
        let Some(handle) = self.state.surface() else {
            return Ok(());
        };
        let drawables: Vec<_> = self
            .document
            .highlights
            .for_page(self.document.shown_page)
            .map(Highlight::to_drawable)
            .collect();
        for drawable in drawables {
            let id = self.surfaces.add_object(handle, drawable)?;
            self.document.highlight_objects.push(id);
        }
        Ok(())
    }
}
