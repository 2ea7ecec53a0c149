//! Hyperparameter search settings for the Gaussian-process surrogate.

use serde::{Deserialize, Serialize};

use crate::error::{ParamOptError, Result};

/// Hyperparameter search settings for the Gaussian-process fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpConfig {
    /// Initial kernel amplitude. Default: 1.0
    pub initial_amplitude: f64,

    /// Admissible amplitude range. Default: (1e-3, 1e3)
    pub amplitude_bounds: (f64, f64),

    /// Initial RBF length scale. Default: 1.0
    pub initial_length_scale: f64,

    /// Admissible length-scale range. Default: (1e-2, 1e2)
    pub length_scale_bounds: (f64, f64),

    /// Random restarts of the likelihood search. Default: 10
    pub n_restarts: usize,

    /// Value added to the covariance diagonal. Default: 1e-10
    pub jitter: f64,
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            initial_amplitude: 1.0,
            amplitude_bounds: (1e-3, 1e3),
            initial_length_scale: 1.0,
            length_scale_bounds: (1e-2, 1e2),
            n_restarts: 10,
            jitter: 1e-10,
        }
    }
}

impl GpConfig {
    /// Set the number of random restarts.
    pub fn with_restarts(mut self, n_restarts: usize) -> Self {
        self.n_restarts = n_restarts;
        self
    }

    /// Set the diagonal jitter.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let (a_lo, a_hi) = self.amplitude_bounds;
        let (l_lo, l_hi) = self.length_scale_bounds;
        if !(a_lo > 0.0 && a_lo < a_hi) || !(l_lo > 0.0 && l_lo < l_hi) {
            return Err(ParamOptError::InvalidConfig(format!(
                "GP hyperparameter bounds must be positive and increasing: amplitude {:?}, length scale {:?}",
                self.amplitude_bounds, self.length_scale_bounds
            )));
        }
        if !(self.jitter >= 0.0) {
            return Err(ParamOptError::InvalidConfig(format!(
                "GP jitter must be non-negative, got {}",
                self.jitter
            )));
        }
        Ok(())
    }

    pub(crate) fn log_bounds(&self) -> [(f64, f64); 2] {
        [
            (self.amplitude_bounds.0.ln(), self.amplitude_bounds.1.ln()),
            (self.length_scale_bounds.0.ln(), self.length_scale_bounds.1.ln()),
        ]
    }
}
