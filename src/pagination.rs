//! Page cursor and last-wins render sequencing.
//!
//! [`PageCursor`] holds the `1 <= current <= total` invariant. The
//! [`PaginationController`] wraps it and issues a [`RenderTicket`] for every
//! page change; a finished render is applied only if its ticket is still the
//! latest one, so a slow render of an older request can never overwrite a
//! newer page.

use crate::types::Drawable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by page navigation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("page {requested} is out of range (1-{total})")]
    PageOutOfRange { requested: u16, total: u16 },
}

/// Result type alias for pagination operations
pub type PageResult<T> = Result<T, PageError>;

/// What happens to annotations when the page changes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationPolicy {
    /// Annotations are dropped on every page change
    #[default]
    ResetPerPage,
    /// Each page keeps its own annotations
    PreservePerPage,
}

// ============================================================================
// Cursor
// ============================================================================

/// A page number bounded by `[1, total]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    current: u16,
    total: u16,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PageCursor {
    /// A cursor on page 1. A total of 0 is treated as 1.
    pub fn new(total: u16) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> u16 {
        self.current
    }

    pub fn total(&self) -> u16 {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// Advance one page. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Go back one page. Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to `page`. Returns whether the cursor moved.
    pub fn jump_to(&mut self, page: u16) -> PageResult<bool> {
        if page == 0 || page > self.total {
            return Err(PageError::PageOutOfRange {
                requested: page,
                total: self.total,
            });
        }
        let moved = page != self.current;
        self.current = page;
        Ok(moved)
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Identifies one page render request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderTicket {
    pub page: u16,
    pub generation: u64,
}

/// Page cursor plus render sequencing and per-page annotation stash.
#[derive(Debug, Default)]
pub struct PaginationController {
    cursor: PageCursor,
    policy: AnnotationPolicy,
    generation: u64,
    latest: Option<RenderTicket>,
    stash: HashMap<u16, Vec<Drawable>>,
}

impl PaginationController {
    pub fn new(total: u16, policy: AnnotationPolicy) -> Self {
        Self {
            cursor: PageCursor::new(total),
            policy,
            ..Default::default()
        }
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn current_page(&self) -> u16 {
        self.cursor.current()
    }

    pub fn total_pages(&self) -> u16 {
        self.cursor.total()
    }

    pub fn policy(&self) -> AnnotationPolicy {
        self.policy
    }

    /// Start over for a new document, forgetting stashed annotations and
    /// invalidating any render still in flight.
    pub fn reset(&mut self, total: u16) {
        self.cursor = PageCursor::new(total);
        self.stash.clear();
        self.latest = None;
        self.generation += 1;
    }

    fn issue(&mut self) -> RenderTicket {
        self.generation += 1;
        let ticket = RenderTicket {
            page: self.cursor.current(),
            generation: self.generation,
        };
        self.latest = Some(ticket);
        debug!(page = ticket.page, generation = ticket.generation, "page render requested");
        ticket
    }

    /// Ticket for rendering the current page (initial load or forced refresh).
    pub fn request_current(&mut self) -> RenderTicket {
        self.issue()
    }

    /// Move forward; a ticket is issued only if the cursor moved.
    pub fn next(&mut self) -> Option<RenderTicket> {
        self.cursor.next().then(|| self.issue())
    }

    /// Move back; a ticket is issued only if the cursor moved.
    pub fn previous(&mut self) -> Option<RenderTicket> {
        self.cursor.previous().then(|| self.issue())
    }

    /// Jump to `page`. Out-of-range pages leave the cursor untouched.
    pub fn jump_to(&mut self, page: u16) -> PageResult<Option<RenderTicket>> {
        Ok(self.cursor.jump_to(page)?.then(|| self.issue()))
    }

    /// Whether a finished render should be applied.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.latest == Some(ticket) && ticket.page == self.cursor.current()
    }

    /// Accept a finished render. Stale tickets are rejected and logged.
    pub fn complete(&mut self, ticket: RenderTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(
                page = ticket.page,
                generation = ticket.generation,
                current = self.cursor.current(),
                "discarding stale page render"
            );
            return false;
        }
        self.latest = None;
        true
    }

    /// Whether a render is outstanding for the current page.
    pub fn is_loading(&self) -> bool {
        self.latest.is_some()
    }

    /// Keep the annotations of `page` for when it is shown again.
    ///
    /// Under `ResetPerPage` the annotations are dropped instead.
    pub fn stash(&mut self, page: u16, drawables: Vec<Drawable>) {
        match self.policy {
            AnnotationPolicy::PreservePerPage => {
                if drawables.is_empty() {
                    self.stash.remove(&page);
                } else {
                    self.stash.insert(page, drawables);
                }
            }
            AnnotationPolicy::ResetPerPage => {
                if !drawables.is_empty() {
                    debug!(page, count = drawables.len(), "annotations dropped on page change");
                }
            }
        }
    }

    /// Take the stashed annotations of `page`, if any.
    pub fn restore(&mut self, page: u16) -> Vec<Drawable> {
        self.stash.remove(&page).unwrap_or_default()
    }

    /// Stashed annotations of a page not currently shown.
    pub fn stashed(&self, page: u16) -> &[Drawable] {
        self.stash.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Log a render that failed; the cursor stays where it is.
    pub fn fail(&mut self, ticket: RenderTicket, reason: &str) {
        if self.latest == Some(ticket) {
            self.latest = None;
        }
        warn!(page = ticket.page, "page render failed: {reason}");
    }
}
