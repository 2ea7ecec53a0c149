//! Utility functions and helpers for the paramopt-rs library.

pub mod matrix_convert;

// Re-export commonly used utilities
pub use matrix_convert::{nalgebra_vec_to_ndarray, ndarray_to_nalgebra, ndarray_vec_to_nalgebra};
