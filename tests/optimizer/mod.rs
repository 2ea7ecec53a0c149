//! Integration tests for boundary adjustment
//!
//! These tests drive the optimizer through recorded histories and check the
//! resulting bounds.

// Tests for the adjustment methods
mod adjustment_tests;
