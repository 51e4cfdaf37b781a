//! Unit tests for docmark.

mod export_tests;
mod loader_tests;
mod pagination_tests;
mod settings_tests;
mod snapshot_tests;
mod surface_tests;
