//! Single test binary entry point.
//!
//! This consolidates all tests into a single binary, reducing linking
//! overhead to one link step.
//!
//! Structure:
//! - helpers: Editor builders, synthesized fixtures, `FakePdf`
//! - integration: Editor workflows end-to-end (open, annotate, paginate, export)
//! - unit: Single-component unit tests

mod integration;
mod unit;
