//! Application-wide constants.
//!
//! Centralizes magic numbers and layout values to make the codebase
//! more maintainable and self-documenting. Values a user may want to tune
//! live in [`crate::settings::Settings`] instead.

// ============================================================================
// Surface Defaults
// ============================================================================

/// Surface size used before any file is loaded
pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (800, 600);

/// Largest footprint an image background may occupy (scaled down if larger)
pub const MAX_CANVAS_SIZE: (u32, u32) = (800, 600);

/// Fill color of a fresh surface and of synthesized text pages
pub const CANVAS_BACKGROUND: &str = "#ffffff";

/// Upscaling factor applied when rendering PDF pages
pub const PDF_RENDER_SCALE: f32 = 1.5;

// ============================================================================
// Colors (default hex values)
// ============================================================================

/// Initial active color
pub const DEFAULT_ACTIVE_COLOR: &str = "#000000";

/// Text color for synthesized document content
pub const DOCUMENT_TEXT_COLOR: &str = "#333333";

/// Highlighter brush color (translucent yellow)
pub const HIGHLIGHT_BRUSH_COLOR: &str = "#ffff0080";

/// PDF text-selection highlight fill, rgba(255, 255, 0, 0.4)
pub const TEXT_HIGHLIGHT_COLOR: &str = "#ffff0066";

// ============================================================================
// Brushes
// ============================================================================

/// Pen width for the draw tool
pub const DRAW_BRUSH_WIDTH: f32 = 3.0;

/// Pen width for the highlight tool
pub const HIGHLIGHT_BRUSH_WIDTH: f32 = 15.0;

// ============================================================================
// Shape Defaults
// ============================================================================

/// Rectangle size when created with a click instead of a drag
pub const DEFAULT_RECT_SIZE: (f32, f32) = (100.0, 100.0);

/// Circle radius when created with a click instead of a drag
pub const DEFAULT_CIRCLE_RADIUS: f32 = 50.0;

/// Placeholder content of a new text box
pub const TEXTBOX_PLACEHOLDER: &str = "Type here";

/// Default font size for text boxes
pub const DEFAULT_FONT_SIZE: f32 = 18.0;

/// Default text box width
pub const DEFAULT_TEXTBOX_WIDTH: f32 = 200.0;

/// Minimum text box width after a drag
pub const MIN_TEXTBOX_WIDTH: f32 = 100.0;

/// Minimum shape extent after a drag
pub const MIN_SHAPE_SIZE: f32 = 20.0;

/// Drags shorter than this (in surface pixels) count as clicks
pub const CLICK_DRAG_THRESHOLD: f32 = 10.0;

/// Width inserted images are scaled to
pub const INSERTED_IMAGE_WIDTH: f32 = 200.0;

// ============================================================================
// Synthesized Document Layout
// ============================================================================

/// Row pitch for spreadsheet cells
pub const TABLE_ROW_HEIGHT: f32 = 30.0;

/// Vertical offset of the first spreadsheet row
pub const TABLE_TOP_OFFSET: f32 = 50.0;

/// Horizontal offset of the first spreadsheet column
pub const TABLE_LEFT_OFFSET: f32 = 50.0;

/// Column pitch for spreadsheet cells
pub const TABLE_COLUMN_WIDTH: f32 = 150.0;

/// Font size of spreadsheet cells
pub const TABLE_FONT_SIZE: f32 = 14.0;

/// Position of extracted Word/Outlook text
pub const DOCUMENT_TEXT_ORIGIN: (f32, f32) = (50.0, 50.0);

/// Font size of extracted Word/Outlook text
pub const DOCUMENT_FONT_SIZE: f32 = 16.0;

/// Line height multiplier for wrapped text
pub const LINE_HEIGHT_FACTOR: f32 = 1.3;

// ============================================================================
// Zoom
// ============================================================================

/// Minimum zoom level
pub const MIN_ZOOM: f32 = 0.5;

/// Maximum zoom level
pub const MAX_ZOOM: f32 = 3.0;

/// Default zoom level
pub const DEFAULT_ZOOM: f32 = 1.0;

// ============================================================================
// Export
// ============================================================================

/// JPEG quality for exported images and PDF page images
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// PDF user-space units per inch
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

// ============================================================================
// Limits
// ============================================================================

/// Input files larger than this are refused before decoding
pub const MAX_INPUT_SIZE_MB: usize = 200;

/// Longest side of any page or surface, in pixels
pub const MAX_PAGE_EXTENT: u32 = 32_768;

/// Largest pixel count of any page or surface (256 MiB of RGBA)
pub const MAX_PAGE_PIXELS: u64 = 64 * 1024 * 1024;

/// Number of background render workers
pub const RENDER_WORKERS: usize = 2;
