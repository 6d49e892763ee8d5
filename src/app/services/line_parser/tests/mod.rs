//! Tests for the fixed-column record parser

use std::io::Cursor;

pub mod hook_tests;
pub mod segment_tests;

/// Wrap text as a buffered reader
pub fn create_test_input(text: &str) -> Cursor<Vec<u8>> {
    Cursor::new(text.as_bytes().to_vec())
}
