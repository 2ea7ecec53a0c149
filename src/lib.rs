//! # paramopt-rs
//!
//! `paramopt-rs` explores the input space of an expensive simulation and
//! narrows it towards the region where the simulation's outputs meet their
//! targets.
//!
//! The library provides:
//! - A bounded parameter space with clamping and normalization
//! - Design-of-experiments sampling: random, grid, Latin hypercube, Sobol and
//!   a lockstep uniform sweep
//! - History-driven boundary adjustment by best result, Gaussian-process
//!   regression, or constraint satisfaction
//! - A manager and an iterative campaign loop tying the pieces together
//!
//! ## Basic Usage
//!
//! ```
//! use paramopt_rs::manager::SimulationParameterManager;
//! use paramopt_rs::optimizer::{AdjustmentMethod, OutputSet};
//! use paramopt_rs::parameters::ParameterSpace;
//! use paramopt_rs::sampling::SamplingStrategy;
//!
//! let mut space = ParameterSpace::new();
//! space.add_parameter("turns", 10.0, 40.0, None, "").unwrap();
//! space.add_parameter("gap", 0.5, 3.0, None, "mm").unwrap();
//!
//! let mut manager = SimulationParameterManager::new(space);
//! for params in manager.get_next_parameters_seeded(10, SamplingStrategy::Lhs, 42).unwrap() {
//!     let loss = (params["turns"] - 25.0).abs() + params["gap"];
//!     let outputs: OutputSet = [("loss".to_string(), loss)].into_iter().collect();
//!     manager.record_simulation_result(&params, &outputs, None);
//! }
//!
//! let target: OutputSet = [("loss".to_string(), 0.0)].into_iter().collect();
//! let tolerance: OutputSet = [("loss".to_string(), 1.0)].into_iter().collect();
//! manager.optimize_boundaries(&target, &tolerance, 0.8, AdjustmentMethod::BestPerformance);
//!
//! let (min, max) = manager.space().get("turns").unwrap().range();
//! assert!((max - min - 24.0).abs() < 1e-9);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

pub mod sampling;

pub mod surrogate;

pub mod optimizer;

pub mod manager;

pub mod campaign;

#[cfg(feature = "regression")]
mod utils;

// Re-exports for convenience
pub use campaign::{Campaign, CampaignConfig, CampaignReport, SimulationExecutor};
pub use error::{ParamOptError, Result};
pub use manager::SimulationParameterManager;
pub use optimizer::{AdjustmentConfig, AdjustmentMethod, OutputSet, ParameterOptimizer};
pub use parameters::{ParameterBound, ParameterSet, ParameterSpace};
pub use sampling::{ParameterSampler, SamplingStrategy};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
