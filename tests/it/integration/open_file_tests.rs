//! Opening and closing files through the editor.

use crate::helpers::{
    FakePdf, RENDER_TIMEOUT, assert_object_count, background_pixel, editor_with_image,
    editor_with_pdf, fixture_for, handle, page_color, png_bytes, surface, test_editor, texts,
};
use docmark::Error;
use docmark::color::Color;
use docmark::constants::MAX_PAGE_EXTENT;
use docmark::loader::{
    LoadError, LoadResult, LoadedPage, PageSource, SourceDocument, SourceKind,
};
use docmark::notifications::ToastVariant;
use docmark::surface::{SurfaceError, fits_raster};
use docmark::types::Tool;

#[test]
fn test_every_accepted_type_sets_background_once() {
    for kind in SourceKind::all() {
        let Some(bytes) = fixture_for(*kind) else {
            continue;
        };
        let mut editor = test_editor();
        editor
            .open_file("fixture", kind.mime(), bytes)
            .unwrap_or_else(|e| panic!("{kind}: {e}"));

        assert_eq!(surface(&editor).background_updates(), 1, "{kind}");
        assert!(editor.state.total_pages() >= 1, "{kind}");
        assert_eq!(editor.state.current_page(), 1, "{kind}");
        assert_eq!(editor.source_kind(), Some(*kind));
        assert_eq!(editor.state.selected_file().unwrap().kind, *kind);
    }
}

#[test]
fn test_pdf_opens_on_first_page() {
    let editor = editor_with_pdf(test_editor(), FakePdf::new(3));

    assert_eq!(editor.state.total_pages(), 3);
    assert_eq!(editor.state.current_page(), 1);
    assert_eq!(surface(&editor).background_updates(), 1);
    assert_eq!(background_pixel(&editor, 0, 0), page_color(1).to_rgba_u8());
}

#[test]
fn test_unsupported_type_changes_nothing() {
    let mut editor = editor_with_image((120, 90));
    let before = handle(&editor);

    let err = editor
        .open_file("notes.txt", "text/plain", b"hello".to_vec())
        .unwrap_err();

    assert!(matches!(err, Error::Load(LoadError::UnsupportedFileType(_))));
    assert_eq!(handle(&editor), before);
    assert_eq!(surface(&editor).background_updates(), 1);
    assert_eq!(editor.source_kind(), Some(SourceKind::Png));

    let toast = editor.toasts.latest().unwrap();
    assert_eq!(toast.variant, ToastVariant::Error);
    assert!(toast.message.contains("text/plain"));
}

#[test]
fn test_unsupported_type_without_open_file() {
    let mut editor = test_editor();
    assert!(editor.open_file("clip.gif", "image/gif", vec![0; 8]).is_err());
    assert!(editor.state.surface().is_none());
    assert_eq!(editor.surfaces.live_count(), 0);
    assert_eq!(editor.toasts.count(), 1);
}

#[test]
fn test_corrupt_file_keeps_previous_document() {
    let mut editor = editor_with_image((120, 90));
    let before = handle(&editor);

    let err = editor
        .open_file("broken.png", "image/png", b"garbage".to_vec())
        .unwrap_err();

    assert!(matches!(err, Error::Load(LoadError::DecodeFailure(_))));
    assert_eq!(handle(&editor), before);
    assert!(editor.surfaces.is_live(before));
    assert_eq!(editor.toasts.latest().unwrap().variant, ToastVariant::Error);
}

#[test]
fn test_opening_second_file_disposes_first_surface() {
    let mut editor = editor_with_image((120, 90));
    let first = handle(&editor);

    editor
        .open_file("b.png", "image/png", png_bytes(60, 40, Color::rgb(1, 2, 3)))
        .unwrap();

    let second = handle(&editor);
    assert_ne!(first, second);
    assert!(!editor.surfaces.is_live(first));
    assert_eq!(editor.surfaces.live_count(), 1);
    assert_eq!(surface(&editor).dimensions(), (60, 40));
    assert_eq!(background_pixel(&editor, 10, 10), [1, 2, 3, 255]);
}

#[test]
fn test_clear_file_invalidates_old_handle() {
    let mut editor = editor_with_image((120, 90));
    let old = handle(&editor);

    editor.clear_file().unwrap();

    assert!(editor.state.surface().is_none());
    assert!(editor.state.selected_file().is_none());
    assert_eq!(editor.surfaces.get(old).err(), Some(SurfaceError::InvalidHandle(old)));
    assert!(editor.surfaces.render(old).is_err());
    assert!(!editor.render().unwrap());
    assert_eq!(editor.state.total_pages(), 1);
}

#[test]
fn test_clear_file_abandons_gesture() {
    let mut editor = editor_with_image((120, 90));
    editor.set_tool(Tool::Draw);
    editor.pointer_down((5.0, 5.0)).unwrap();

    editor.clear_file().unwrap();

    assert!(editor.tools.state().is_idle());
}

#[test]
fn test_text_documents_are_editable_text() {
    let mut editor = test_editor();
    editor
        .open_file("mail.msg", SourceKind::Msg.mime(), crate::helpers::msg_bytes("Hi", "Body"))
        .unwrap();

    let shown = texts(&editor);
    assert_eq!(shown.len(), 1);
    assert!(shown[0].contains("Subject: Hi"));
    // Synthesized text can be selected like any annotation.
    assert_object_count(&editor, 1);
    assert!(surface(&editor).objects().all(|(_, d)| d.selectable));
}

#[test]
fn test_spreadsheet_grid_surface_grows_with_rows() {
    let rows: Vec<Vec<String>> = (0..40).map(|i| vec![format!("row {i}")]).collect();
    let borrowed: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
    let slices: Vec<&[&str]> = borrowed.iter().map(Vec::as_slice).collect();

    let mut editor = test_editor();
    editor
        .open_file(
            "big.xlsx",
            SourceKind::Xlsx.mime(),
            crate::helpers::xlsx_bytes(&[("Rows", &slices)]),
        )
        .unwrap();

    // Title plus forty rows at 30 units each, with top and bottom margins.
    assert_eq!(texts(&editor).len(), 41);
    let (_, height) = surface(&editor).dimensions();
    assert!(height > 600, "height {height}");
}

#[test]
fn test_very_tall_spreadsheet_continues_on_more_pages() {
    let rows: Vec<Vec<String>> = (0..2500).map(|i| vec![format!("row {i}")]).collect();
    let borrowed: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
    let slices: Vec<&[&str]> = borrowed.iter().map(Vec::as_slice).collect();

    let mut editor = test_editor();
    editor
        .open_file(
            "log.xlsx",
            SourceKind::Xlsx.mime(),
            crate::helpers::xlsx_bytes(&[("Log", &slices)]),
        )
        .unwrap();

    assert_eq!(editor.state.total_pages(), 3);
    let (width, height) = surface(&editor).dimensions();
    assert!(fits_raster(width, height), "{width}x{height}");
    assert!(height <= MAX_PAGE_EXTENT);

    editor.next_page().unwrap();
    editor.wait_for_renders(RENDER_TIMEOUT).unwrap();
    assert_eq!(texts(&editor)[0], "row 1087");
}

/// One page wider than any surface can be.
struct OversizedPage;

impl PageSource for OversizedPage {
    fn page_count(&self) -> u16 {
        1
    }

    fn render_page(&self, _page: u16) -> LoadResult<LoadedPage> {
        Ok(LoadedPage::blank((MAX_PAGE_EXTENT + 1, 10), Vec::new()))
    }
}

#[test]
fn test_oversized_first_page_keeps_previous_document() {
    let mut editor = editor_with_image((120, 90));
    let before = handle(&editor);

    let document = SourceDocument::new(SourceKind::Pdf, std::sync::Arc::new(OversizedPage));
    let err = editor.open_document("huge.pdf", document).unwrap_err();

    assert!(matches!(
        err,
        Error::Load(LoadError::PageTooLarge { width, height: 10 })
            if width == u64::from(MAX_PAGE_EXTENT) + 1
    ));
    assert_eq!(handle(&editor), before);
    assert!(editor.surfaces.is_live(before));
    assert_eq!(editor.toasts.latest().unwrap().variant, ToastVariant::Error);
}
