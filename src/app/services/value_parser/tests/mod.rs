//! Tests for value parsers
