//! Integration tests for the sampling strategies
//!
//! These tests check each strategy's placement properties on real parameter
//! ranges rather than on the unit hypercube.
