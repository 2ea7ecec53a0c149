//! # Parameter System
//!
//! This module defines the bounded numeric parameters that a design sweep
//! explores, and the ordered space they form.
//!
//! ## Core Components
//!
//! - [`ParameterBound`]: a named scalar with a `[min, max]` range, a current
//!   value that always stays inside the range, and a unit tag
//! - [`ParameterSpace`]: an insertion-ordered collection of bounds with bulk
//!   value updates, range replacement and range shrinking
//! - [`ParameterSet`]: an ordered `name -> value` mapping passed to and from
//!   the simulation executor
//!
//! ## Example Usage
//!
//! ```rust
//! use paramopt_rs::parameters::ParameterSpace;
//!
//! let mut space = ParameterSpace::new();
//! space.add_parameter("N1", 5.0, 20.0, Some(10.0), "turns").unwrap();
//! space.add_parameter("w1", 50e-3, 200e-3, Some(100e-3), "m").unwrap();
//!
//! // Narrow the search around the current design
//! space.shrink_boundaries(0.8, None);
//!
//! let current = space.get_current_values();
//! assert_eq!(current["N1"], 10.0);
//! ```

pub mod bound;
pub mod space;

// Re-export key types
pub use bound::{BoundError, ParameterBound};
pub use space::{ParameterSet, ParameterSpace};
