//! Snapshot tests using the insta crate.
//!
//! These pin the JSON shape of drawables, highlights and script actions,
//! the formats a front end or a replay script reads and writes.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use docmark::color::Color;
use docmark::export::ExportFormat;
use docmark::highlights::Highlight;
use docmark::pagination::AnnotationPolicy;
use docmark::script::{self, Action};
use docmark::types::{Drawable, LineCap, Tool};

// ============================================================================
// Drawable Serialization Tests
// ============================================================================

#[test]
fn snapshot_rectangle() {
    let rect = Drawable::rectangle((10.5, 20.5), (30.5, 40.5), Color::rgb(255, 0, 0))
        .with_opacity(0.5);
    insta::assert_json_snapshot!(rect, @r###"
    {
      "position": [
        10.5,
        20.5
      ],
      "opacity": 0.5,
      "selectable": true,
      "kind": "rectangle",
      "size": [
        30.5,
        40.5
      ],
      "fill": "#ff0000"
    }
    "###);
}

#[test]
fn snapshot_text_box() {
    let text = Drawable::text_box((12.5, 8.5), "Hello", 12.5, 150.5, Color::rgb(0x33, 0x33, 0x33))
        .with_opacity(0.5);
    insta::assert_json_snapshot!(text, @r###"
    {
      "position": [
        12.5,
        8.5
      ],
      "opacity": 0.5,
      "selectable": true,
      "kind": "text_box",
      "text": "Hello",
      "font_size": 12.5,
      "width": 150.5,
      "color": "#333333",
      "background": null
    }
    "###);
}

#[test]
fn snapshot_highlighter_stroke() {
    let stroke = Drawable::stroke(
        vec![(0.5, 0.5), (10.5, 4.5)],
        Color::rgba(255, 255, 0, 128),
        2.5,
        LineCap::Square,
    )
    .with_opacity(0.75);
    insta::assert_json_snapshot!(stroke, @r###"
    {
      "position": [
        0.5,
        0.5
      ],
      "opacity": 0.75,
      "selectable": true,
      "kind": "freehand_stroke",
      "points": [
        [
          0.5,
          0.5
        ],
        [
          10.5,
          4.5
        ]
      ],
      "color": "#ffff0080",
      "width": 2.5,
      "cap": "square"
    }
    "###);
}

#[test]
fn snapshot_pdf_highlight() {
    let highlight = Highlight::from_corners(2, (40.75, 25.0), (10.5, 20.5));
    insta::assert_json_snapshot!(highlight, @r###"
    {
      "page": 2,
      "x": 10.5,
      "y": 20.5,
      "width": 30.25,
      "height": 4.5
    }
    "###);
}

// ============================================================================
// Script and Enum Serialization Tests
// ============================================================================

#[test]
fn snapshot_script_actions() {
    let actions = vec![
        Action::SetTool { tool: Tool::Highlight },
        Action::Stroke {
            points: vec![(1.5, 2.5), (3.5, 4.5)],
        },
        Action::JumpTo { page: 3 },
        Action::UndoHighlight,
    ];
    insta::assert_json_snapshot!(actions, @r###"
    [
      {
        "action": "set_tool",
        "tool": "highlight"
      },
      {
        "action": "stroke",
        "points": [
          [
            1.5,
            2.5
          ],
          [
            3.5,
            4.5
          ]
        ]
      },
      {
        "action": "jump_to",
        "page": 3
      },
      {
        "action": "undo_highlight"
      }
    ]
    "###);
}

#[test]
fn test_script_round_trips_through_json() {
    let actions = vec![
        Action::SetColor {
            color: Color::rgb(0, 128, 255),
        },
        Action::PointerDown { x: 1.5, y: 2.5 },
        Action::Zoom { delta: 0.25 },
    ];
    let json = serde_json::to_string(&actions).unwrap();
    assert_eq!(script::parse(&json).unwrap(), actions);
}

#[test]
fn snapshot_enums() {
    insta::assert_json_snapshot!(
        (ExportFormat::Pdf, AnnotationPolicy::PreservePerPage, Tool::Textbox),
        @r###"
    [
      "pdf",
      "preserve_per_page",
      "textbox"
    ]
    "###
    );
}
