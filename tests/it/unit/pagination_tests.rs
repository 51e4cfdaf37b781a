//! Unit tests for the page cursor and render sequencing.

use docmark::color::Color;
use docmark::pagination::{AnnotationPolicy, PageCursor, PageError, PaginationController};
use docmark::types::Drawable;

fn note() -> Drawable {
    Drawable::rectangle((1.5, 2.5), (10.5, 10.5), Color::BLACK)
}

#[test]
fn test_cursor_walks_forward_and_back() {
    let mut cursor = PageCursor::new(3);
    assert!(cursor.is_first());
    assert!(cursor.next());
    assert!(cursor.next());
    assert!(cursor.is_last());
    assert!(!cursor.next());
    assert_eq!(cursor.current(), 3);

    assert!(cursor.previous());
    assert_eq!(cursor.current(), 2);
}

#[test]
fn test_cursor_jump_bounds() {
    let mut cursor = PageCursor::new(4);
    assert_eq!(cursor.jump_to(4), Ok(true));
    assert_eq!(cursor.jump_to(4), Ok(false));
    assert_eq!(
        cursor.jump_to(0),
        Err(PageError::PageOutOfRange { requested: 0, total: 4 })
    );
    assert_eq!(
        cursor.jump_to(5),
        Err(PageError::PageOutOfRange { requested: 5, total: 4 })
    );
    assert_eq!(cursor.current(), 4);
}

#[test]
fn test_single_page_document_never_moves() {
    let mut pages = PaginationController::new(1, AnnotationPolicy::ResetPerPage);
    assert_eq!(pages.next(), None);
    assert_eq!(pages.previous(), None);
    assert_eq!(pages.jump_to(1), Ok(None));
    assert!(!pages.is_loading());
}

#[test]
fn test_latest_request_wins() {
    let mut pages = PaginationController::new(5, AnnotationPolicy::ResetPerPage);
    let to_three = pages.jump_to(3).unwrap().unwrap();
    let to_two = pages.previous().unwrap();

    assert!(pages.is_loading());
    assert!(!pages.complete(to_three));
    assert!(pages.complete(to_two));
    assert!(!pages.is_loading());
    assert_eq!(pages.current_page(), 2);
}

#[test]
fn test_returning_to_a_page_reissues_ticket() {
    let mut pages = PaginationController::new(3, AnnotationPolicy::ResetPerPage);
    let first_visit = pages.next().unwrap();
    pages.previous().unwrap();
    let second_visit = pages.next().unwrap();

    assert_eq!(first_visit.page, second_visit.page);
    assert_ne!(first_visit, second_visit);
    assert!(!pages.complete(first_visit));
    assert!(pages.complete(second_visit));
}

#[test]
fn test_failed_render_keeps_cursor() {
    let mut pages = PaginationController::new(3, AnnotationPolicy::ResetPerPage);
    let ticket = pages.next().unwrap();
    pages.fail(ticket, "corrupt page");

    assert!(!pages.is_loading());
    assert_eq!(pages.current_page(), 2);
}

#[test]
fn test_reset_per_page_drops_annotations() {
    let mut pages = PaginationController::new(3, AnnotationPolicy::ResetPerPage);
    pages.stash(1, vec![note()]);
    assert!(pages.stashed(1).is_empty());
    assert!(pages.restore(1).is_empty());
}

#[test]
fn test_preserve_per_page_round_trips_annotations() {
    let mut pages = PaginationController::new(3, AnnotationPolicy::PreservePerPage);
    pages.stash(1, vec![note(), note()]);
    assert_eq!(pages.stashed(1).len(), 2);

    let restored = pages.restore(1);
    assert_eq!(restored.len(), 2);
    assert_eq!(restored[0].position, (1.5, 2.5));
    // Restoring takes ownership; a second restore is empty.
    assert!(pages.restore(1).is_empty());
}

#[test]
fn test_reset_clears_stash_and_total() {
    let mut pages = PaginationController::new(3, AnnotationPolicy::PreservePerPage);
    pages.stash(2, vec![note()]);
    let ticket = pages.next().unwrap();

    pages.reset(7);

    assert_eq!(pages.total_pages(), 7);
    assert_eq!(pages.current_page(), 1);
    assert!(pages.stashed(2).is_empty());
    assert!(!pages.is_current(ticket));
}
