//! Integration tests for the parameter space
//!
//! These tests verify bounds, value assignment and boundary updates as seen
//! through the public API.

// Tests for ParameterBound
mod bound_tests;
