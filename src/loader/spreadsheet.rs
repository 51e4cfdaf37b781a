//! XLS/XLSX workbooks laid out as a grid of text drawables.
//!
//! Cells stay individual text drawables rather than flattened pixels so each
//! one can be selected and moved like any other annotation.

use super::{LoadError, LoadResult, LoadedPage};
use crate::color::Color;
use crate::constants::{
    DOCUMENT_TEXT_COLOR, MAX_PAGE_EXTENT, MAX_PAGE_PIXELS, TABLE_COLUMN_WIDTH, TABLE_FONT_SIZE,
    TABLE_LEFT_OFFSET, TABLE_ROW_HEIGHT, TABLE_TOP_OFFSET,
};
use crate::surface::fits_raster;
use crate::types::Drawable;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::debug;

/// Grid geometry for synthesized tables
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub row_height: f32,
    pub top_offset: f32,
    pub left_offset: f32,
    pub column_width: f32,
    pub font_size: f32,
}

/// Largest row height, column width, font size or margin a layout may use
const MAX_LAYOUT_LENGTH: f32 = 1000.0;

impl TableLayout {
    /// Replace lengths that cannot lay out a grid with their defaults.
    pub(crate) fn sanitized(self) -> Self {
        let defaults = Self::default();
        let length = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value.min(MAX_LAYOUT_LENGTH)
            } else {
                fallback
            }
        };
        let offset = |value: f32, fallback: f32| {
            if value.is_finite() && value >= 0.0 {
                value.min(MAX_LAYOUT_LENGTH)
            } else {
                fallback
            }
        };
        Self {
            row_height: length(self.row_height, defaults.row_height),
            top_offset: offset(self.top_offset, defaults.top_offset),
            left_offset: offset(self.left_offset, defaults.left_offset),
            column_width: length(self.column_width, defaults.column_width),
            font_size: length(self.font_size, defaults.font_size),
        }
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            row_height: TABLE_ROW_HEIGHT,
            top_offset: TABLE_TOP_OFFSET,
            left_offset: TABLE_LEFT_OFFSET,
            column_width: TABLE_COLUMN_WIDTH,
            font_size: TABLE_FONT_SIZE,
        }
    }
}

/// How sheets map onto pages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetPaging {
    /// Every sheet stacked on one tall page
    #[default]
    SinglePage,
    /// One page per sheet
    PagePerSheet,
}

/// A sheet's cell text, row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Read every sheet of a workbook as display strings.
pub fn read_sheets(bytes: Vec<u8>) -> LoadResult<Vec<Sheet>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let rows = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect();
        sheets.push(Sheet { name, rows });
    }
    debug!(sheets = sheets.len(), "workbook read");
    Ok(sheets)
}

/// Places sheets top to bottom, one text drawable per non-empty cell.
///
/// Rows that would push the page past the raster limits continue on a
/// fresh page.
struct GridWriter<'a> {
    layout: &'a TableLayout,
    color: Color,
    min_height: u32,
    width: u32,
    max_height: f32,
    y: f32,
    drawables: Vec<Drawable>,
    pages: Vec<LoadedPage>,
}

impl<'a> GridWriter<'a> {
    /// A writer for pages wide enough for `columns` cells.
    fn new(layout: &'a TableLayout, columns: usize, min_size: (u32, u32)) -> LoadResult<Self> {
        let needed = 2.0 * layout.left_offset + columns as f32 * layout.column_width;
        let width = min_size.0.max(needed.ceil() as u32);
        if !fits_raster(width, min_size.1) {
            return Err(LoadError::PageTooLarge {
                width: u64::from(width),
                height: u64::from(min_size.1),
            });
        }
        let max_height = MAX_PAGE_EXTENT.min((MAX_PAGE_PIXELS / u64::from(width)) as u32);
        Ok(Self {
            layout,
            color: Color::parse_or(DOCUMENT_TEXT_COLOR, Color::BLACK),
            min_height: min_size.1,
            width,
            max_height: max_height as f32,
            y: layout.top_offset,
            drawables: Vec::new(),
            pages: Vec::new(),
        })
    }

    fn text(&mut self, column: usize, text: &str) {
        let x = self.layout.left_offset + column as f32 * self.layout.column_width;
        self.drawables.push(Drawable::text_box(
            (x, self.y),
            text,
            self.layout.font_size,
            self.layout.column_width,
            self.color,
        ));
    }

    /// Start a new page when the next row would not fit on this one.
    fn make_room(&mut self) {
        let bottom = self.y + self.layout.row_height + self.layout.top_offset;
        if bottom > self.max_height && self.y > self.layout.top_offset {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        let height = self.min_height.max((self.y + self.layout.top_offset).ceil() as u32);
        let drawables = std::mem::take(&mut self.drawables);
        self.pages.push(LoadedPage::blank((self.width, height), drawables));
        self.y = self.layout.top_offset;
    }

    fn sheet(&mut self, index: usize, sheet: &Sheet) {
        self.make_room();
        self.text(0, &format!("Sheet {} ({})", index + 1, sheet.name));
        self.y += self.layout.row_height;
        for row in &sheet.rows {
            self.make_room();
            for (column, cell) in row.iter().enumerate() {
                if !cell.trim().is_empty() {
                    self.text(column, cell);
                }
            }
            self.y += self.layout.row_height;
        }
    }

    /// Every page written so far. Pages are never smaller than the minimum
    /// size and grow one row height per row.
    fn finish(mut self) -> Vec<LoadedPage> {
        self.break_page();
        if self.pages.len() > 1 {
            debug!(pages = self.pages.len(), "table continued over several pages");
        }
        self.pages
    }
}

fn column_count<'s>(sheets: impl IntoIterator<Item = &'s Sheet>) -> usize {
    sheets
        .into_iter()
        .flat_map(|sheet| sheet.rows.iter().map(Vec::len))
        .max()
        .unwrap_or(0)
}

/// Lay sheets out as pages according to `paging`.
///
/// Fails with [`LoadError::PageTooLarge`] when a sheet has more columns than
/// one page can hold.
pub fn layout_sheets(
    sheets: &[Sheet],
    layout: &TableLayout,
    paging: SheetPaging,
    min_size: (u32, u32),
) -> LoadResult<Vec<LoadedPage>> {
    match paging {
        SheetPaging::SinglePage => {
            let mut writer = GridWriter::new(layout, column_count(sheets), min_size)?;
            for (index, sheet) in sheets.iter().enumerate() {
                if index > 0 {
                    writer.y += layout.row_height;
                }
                writer.sheet(index, sheet);
            }
            Ok(writer.finish())
        }
        SheetPaging::PagePerSheet if !sheets.is_empty() => {
            let mut pages = Vec::with_capacity(sheets.len());
            for (index, sheet) in sheets.iter().enumerate() {
                let mut writer = GridWriter::new(layout, column_count([sheet]), min_size)?;
                writer.sheet(index, sheet);
                pages.extend(writer.finish());
            }
            Ok(pages)
        }
        SheetPaging::PagePerSheet => Ok(vec![LoadedPage::blank(min_size, Vec::new())]),
    }
}

/// Decode a workbook into laid-out pages.
pub fn load_workbook(
    bytes: Vec<u8>,
    layout: &TableLayout,
    paging: SheetPaging,
    min_size: (u32, u32),
) -> LoadResult<Vec<LoadedPage>> {
    let sheets = read_sheets(bytes)?;
    layout_sheets(&sheets, layout, paging, min_size)
}
