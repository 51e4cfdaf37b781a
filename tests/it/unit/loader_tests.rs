//! Unit tests for source decoding.

use crate::helpers::{doc_bytes, docx_bytes, fixture_for, msg_bytes, png_bytes, xlsx_bytes};
use docmark::color::Color;
use docmark::loader::{
    ContentLoader, LoadError, LoaderConfig, SheetPaging, SourceCategory, SourceKind,
};
use docmark::types::DrawableKind;
use std::path::Path;

fn loader() -> ContentLoader {
    ContentLoader::new(LoaderConfig::default())
}

fn page_texts(kind: SourceKind, bytes: Vec<u8>) -> Vec<String> {
    let document = loader().load(kind, bytes).unwrap();
    let page = document.render_page(1).unwrap();
    page.overlays
        .iter()
        .filter_map(|d| match &d.kind {
            DrawableKind::TextBox { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_mime_table() {
    let cases = [
        ("image/png", SourceKind::Png),
        ("image/jpeg", SourceKind::Jpeg),
        ("application/pdf", SourceKind::Pdf),
        ("application/msword", SourceKind::Doc),
        (
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            SourceKind::Docx,
        ),
        ("application/vnd.ms-excel", SourceKind::Xls),
        (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            SourceKind::Xlsx,
        ),
        ("application/vnd.ms-outlook", SourceKind::Msg),
    ];
    for (mime, kind) in cases {
        assert_eq!(SourceKind::from_mime(mime).unwrap(), kind, "{mime}");
    }
}

#[test]
fn test_unsupported_mime() {
    for mime in ["text/plain", "image/gif", "application/zip", ""] {
        assert!(
            matches!(SourceKind::from_mime(mime), Err(LoadError::UnsupportedFileType(_))),
            "{mime} should be rejected"
        );
    }
}

#[test]
fn test_path_detection() {
    assert_eq!(SourceKind::from_path(Path::new("scan.JPG")).unwrap(), SourceKind::Jpeg);
    assert_eq!(SourceKind::from_path(Path::new("book.xls")).unwrap(), SourceKind::Xls);
    assert!(SourceKind::from_path(Path::new("notes.txt")).is_err());
}

#[test]
fn test_categories() {
    assert_eq!(SourceKind::Png.category(), SourceCategory::Image);
    assert_eq!(SourceKind::Xls.category(), SourceCategory::Spreadsheet);
    assert_eq!(SourceKind::Doc.category(), SourceCategory::Word);
    assert_eq!(SourceKind::Msg.category(), SourceCategory::Outlook);
}

#[test]
fn test_image_keeps_natural_size_when_it_fits() {
    let document = loader()
        .load(SourceKind::Png, png_bytes(120, 80, Color::rgb(10, 20, 30)))
        .unwrap();
    assert_eq!(document.page_count(), 1);
    let page = document.render_page(1).unwrap();
    assert_eq!(page.size, (120, 80));
    assert!(page.overlays.is_empty());
    assert_eq!(page.background.image().get_pixel(5, 5).0, [10, 20, 30, 255]);
}

#[test]
fn test_large_image_is_scaled_to_fit() {
    let document = loader()
        .load(SourceKind::Png, png_bytes(1600, 600, Color::WHITE))
        .unwrap();
    assert_eq!(document.render_page(1).unwrap().size, (800, 300));
}

#[test]
fn test_corrupt_image_is_decode_failure() {
    let result = loader().load(SourceKind::Png, b"definitely not a png".to_vec());
    assert!(matches!(result, Err(LoadError::DecodeFailure(_))));
}

#[test]
fn test_docx_paragraphs_become_one_text_box() {
    let texts = page_texts(SourceKind::Docx, docx_bytes(&["First line", "Second line"]));
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("First line"));
    assert!(texts[0].contains("Second line"));
}

#[test]
fn test_doc_piece_table_text() {
    let texts = page_texts(SourceKind::Doc, doc_bytes("Quarterly report\r"));
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Quarterly report"));
}

#[test]
fn test_doc_without_word_stream_fails() {
    let result = loader().load(SourceKind::Doc, msg_bytes("s", "b"));
    assert!(matches!(result, Err(LoadError::DecodeFailure(_))));
}

#[test]
fn test_msg_subject_and_body() {
    let texts = page_texts(SourceKind::Msg, msg_bytes("Quarterly numbers", "See attached."));
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("Subject: Quarterly numbers"));
    assert!(texts[0].contains("See attached."));
}

#[test]
fn test_xlsx_cells_become_text_boxes() {
    let rows: &[&[&str]] = &[&["Name", "Qty"], &["Apples", "3"], &["Pears", ""]];
    let texts = page_texts(SourceKind::Xlsx, xlsx_bytes(&[("Fruit", rows)]));
    assert_eq!(texts, vec!["Sheet 1 (Fruit)", "Name", "Qty", "Apples", "3", "Pears"]);
}

#[test]
fn test_xls_mime_accepts_workbook_bytes() {
    let rows: &[&[&str]] = &[&["a"]];
    let texts = page_texts(SourceKind::Xls, xlsx_bytes(&[("Only", rows)]));
    assert_eq!(texts, vec!["Sheet 1 (Only)", "a"]);
}

#[test]
fn test_sheets_stack_on_one_page_by_default() {
    let first: &[&[&str]] = &[&["x"]];
    let second: &[&[&str]] = &[&["y"]];
    let document = loader()
        .load(SourceKind::Xlsx, xlsx_bytes(&[("A", first), ("B", second)]))
        .unwrap();
    assert_eq!(document.page_count(), 1);
    let page = document.render_page(1).unwrap();
    assert_eq!(page.overlays.len(), 4);
}

#[test]
fn test_page_per_sheet_paging() {
    let config = LoaderConfig {
        sheet_paging: SheetPaging::PagePerSheet,
        ..LoaderConfig::default()
    };
    let first: &[&[&str]] = &[&["x"]];
    let second: &[&[&str]] = &[&["y"]];
    let document = ContentLoader::new(config)
        .load(SourceKind::Xlsx, xlsx_bytes(&[("A", first), ("B", second)]))
        .unwrap();

    assert_eq!(document.page_count(), 2);
    let second_page = document.render_page(2).unwrap();
    let titles: Vec<_> = second_page
        .overlays
        .iter()
        .filter_map(|d| match &d.kind {
            DrawableKind::TextBox { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["Sheet 2 (B)", "y"]);
}

#[test]
fn test_every_fixture_decodes() {
    for kind in SourceKind::all() {
        let Some(bytes) = fixture_for(*kind) else {
            continue;
        };
        let document = loader().load(*kind, bytes).unwrap_or_else(|e| panic!("{kind}: {e}"));
        assert!(document.page_count() >= 1, "{kind}");
        assert_eq!(document.kind(), *kind);
    }
}

#[test]
fn test_missing_page_is_an_error() {
    let document = loader()
        .load(SourceKind::Png, png_bytes(10, 10, Color::WHITE))
        .unwrap();
    assert!(matches!(
        document.render_page(2),
        Err(LoadError::MissingPage { page: 2, total: 1 })
    ));
}
