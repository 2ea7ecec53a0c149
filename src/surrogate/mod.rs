//! Surrogate regression models.
//!
//! The regression-guided boundary adjustment fits one model per target output
//! and queries its posterior mean and uncertainty at candidate parameter sets.
//! The model itself requires the `regression` feature; its configuration is
//! always available so that configuration files stay portable.

mod config;
#[cfg(feature = "regression")]
mod gp;

pub use config::GpConfig;
#[cfg(feature = "regression")]
pub use gp::GaussianProcess;
