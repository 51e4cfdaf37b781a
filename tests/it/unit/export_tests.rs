//! Unit tests for export artifacts and PDF assembly.

use crate::helpers::solid_image;
use docmark::color::Color;
use docmark::export::{ExportArtifact, ExportError, ExportFormat, PdfPage, assemble_pdf};
use docmark::loader::SourceKind;
use tempfile::TempDir;

fn media_boxes(pdf: &[u8]) -> Vec<Vec<f32>> {
    let document = lopdf::Document::load_mem(pdf).unwrap();
    document
        .get_pages()
        .values()
        .map(|id| {
            let page = document.get_dictionary(*id).unwrap();
            page.get(b"MediaBox")
                .unwrap()
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_float().unwrap())
                .collect()
        })
        .collect()
}

#[test]
fn test_format_metadata() {
    assert_eq!(ExportFormat::Png.mime(), "image/png");
    assert_eq!(ExportFormat::Jpeg.mime(), "image/jpeg");
    assert_eq!(ExportFormat::Pdf.mime(), "application/pdf");
    assert!(ExportFormat::Pdf.raster().is_none());
    assert!(ExportFormat::Png.raster().is_some());
}

#[test]
fn test_office_sources_export_png() {
    for kind in [SourceKind::Docx, SourceKind::Doc, SourceKind::Xls, SourceKind::Msg] {
        assert_eq!(ExportFormat::for_source(kind), ExportFormat::Png, "{kind}");
    }
}

#[test]
fn test_artifact_save_to_directory() {
    let dir = TempDir::new().unwrap();
    let artifact = ExportArtifact::new(vec![1, 2, 3], ExportFormat::Png, "annotated-image.png");

    let path = artifact.save_to(dir.path()).unwrap();

    assert_eq!(path, dir.path().join("annotated-image.png"));
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_artifact_save_as_creates_parents_and_overwrites() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out").join("result.pdf");
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    std::fs::write(&target, b"old").unwrap();

    let artifact = ExportArtifact::new(b"%PDF-new".to_vec(), ExportFormat::Pdf, "ignored.pdf");
    artifact.save_as(&target).unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-new");
}

#[test]
fn test_data_url_carries_mime() {
    let artifact = ExportArtifact::new(vec![0xff, 0xd8], ExportFormat::Jpeg, "x.jpeg");
    assert_eq!(artifact.to_data_url(), "data:image/jpeg;base64,/9g=");
    assert_eq!(artifact.len(), 2);
    assert!(!artifact.is_empty());
}

#[test]
fn test_pdf_pages_keep_their_own_sizes() {
    let pages = [
        PdfPage::from_render(solid_image(918, 1188, Color::WHITE), 1.5),
        PdfPage::from_render(solid_image(1188, 918, Color::WHITE), 1.5),
    ];
    let pdf = assemble_pdf(&pages, 80).unwrap();

    let boxes = media_boxes(&pdf);
    assert_eq!(boxes.len(), 2);
    assert_eq!(boxes[0], vec![0.0, 0.0, 612.0, 792.0]);
    assert_eq!(boxes[1], vec![0.0, 0.0, 792.0, 612.0]);
}

#[test]
fn test_pdf_page_from_dpi() {
    let page = PdfPage::from_dpi(solid_image(300, 150, Color::WHITE), 144.0);
    assert_eq!(page.size_pt, (150.0, 75.0));
}

#[test]
fn test_invalid_scale_falls_back_to_pixels() {
    let page = PdfPage::from_render(solid_image(40, 20, Color::WHITE), 0.0);
    assert_eq!(page.size_pt, (40.0, 20.0));
}

#[test]
fn test_pdf_embeds_jpeg_images() {
    let pdf = assemble_pdf(&[PdfPage::from_render(solid_image(20, 10, Color::BLACK), 1.0)], 90)
        .unwrap();
    let document = lopdf::Document::load_mem(&pdf).unwrap();
    let images: Vec<_> = document
        .objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .is_ok_and(|name| name == b"Image")
        })
        .collect();

    assert_eq!(images.len(), 1);
    let filter = images[0].dict.get(b"Filter").unwrap().as_name().unwrap();
    assert_eq!(filter, b"DCTDecode");
    assert_eq!(images[0].dict.get(b"Width").unwrap().as_i64().unwrap(), 20);
}

#[test]
fn test_empty_pdf_is_rejected() {
    assert!(matches!(assemble_pdf(&[], 90), Err(ExportError::NothingToExport)));
}
