//! Integration tests for docmark.
//!
//! These tests drive a whole `Editor` and verify the interaction between
//! loading, the surface, the tool state machine, pagination and export.

mod annotation_tests;
mod open_file_tests;
