//! Unit tests for settings persistence.

use docmark::color::Color;
use docmark::loader::{SheetPaging, TableLayout};
use docmark::pagination::AnnotationPolicy;
use docmark::settings::{Settings, SettingsError};
use tempfile::TempDir;

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        annotation_policy: AnnotationPolicy::PreservePerPage,
        default_color: Color::rgb(0x12, 0x34, 0x56),
        sheet_paging: SheetPaging::PagePerSheet,
        jpeg_quality: 75,
        ..Settings::default()
    };
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_colors_stored_as_hex() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    Settings {
        default_color: Color::rgb(255, 0, 0),
        ..Settings::default()
    }
    .save_to(&path)
    .unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains(r##""default_color": "#ff0000""##));
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "table_layout": { "row_height": 24.0 } }"#).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded.table_layout.row_height, 24.0);
    assert_eq!(loaded.table_layout.column_width, TableLayout::default().column_width);
    assert_eq!(loaded.annotation_policy, AnnotationPolicy::ResetPerPage);
}

#[test]
fn test_unusable_values_are_sanitized_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "pdf_render_scale": 0.0, "default_canvas_size": [0, 0], "jpeg_quality": 250 }"#,
    )
    .unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    let defaults = Settings::default();
    assert_eq!(loaded.pdf_render_scale, defaults.pdf_render_scale);
    assert_eq!(loaded.default_canvas_size, defaults.default_canvas_size);
    assert_eq!(loaded.jpeg_quality, 100);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Settings::load_from(&path), Err(SettingsError::Json(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load_from(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(SettingsError::Io(_))));
}

#[test]
fn test_loader_config_mirrors_settings() {
    let settings = Settings {
        pdf_render_scale: 2.0,
        sheet_paging: SheetPaging::PagePerSheet,
        ..Settings::default()
    };
    let config = settings.loader_config();
    assert_eq!(config.pdf_render_scale, 2.0);
    assert_eq!(config.sheet_paging, SheetPaging::PagePerSheet);
    assert_eq!(config.max_canvas_size, settings.max_canvas_size);
}

#[test]
fn test_save_replaces_existing_file_without_leftovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "stale").unwrap();

    let settings = Settings {
        jpeg_quality: 42,
        ..Settings::default()
    };
    settings.save_to(&path).unwrap();

    assert_eq!(Settings::load_from(&path).unwrap(), settings);
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_degenerate_table_layout_is_sanitized_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "table_layout": { "row_height": 0.0, "column_width": -40.0, "top_offset": 8.0 } }"#,
    )
    .unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    let defaults = TableLayout::default();
    assert_eq!(loaded.table_layout.row_height, defaults.row_height);
    assert_eq!(loaded.table_layout.column_width, defaults.column_width);
    assert_eq!(loaded.table_layout.top_offset, 8.0);
}

#[test]
fn test_oversized_canvas_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "default_canvas_size": [100000, 100000] }"#).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded.default_canvas_size, Settings::default().default_canvas_size);
}
