//! Sampling of candidate parameter sets.
//!
//! [`ParameterSampler`] draws `n` points from the unit hypercube of a
//! [`ParameterSpace`] under a [`SamplingStrategy`] and maps each column back
//! through the matching parameter's range. The sampler holds no state beyond a
//! borrow of the space: a call is a pure function of the sample count, the
//! strategy, the RNG it is handed and the current bounds.

pub mod hypercube;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ParamOptError, Result};
use crate::parameters::{ParameterSet, ParameterSpace};

/// Strategy for placing points in the normalized parameter space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingStrategy {
    /// Independent uniform draws per cell
    Random,

    /// Full factorial grid, truncated to the requested count
    Grid,

    /// Latin hypercube: one point per bin per dimension
    Lhs,

    /// Scrambled Sobol low-discrepancy sequence.
    ///
    /// At most `2^16` points and `hypercube::SOBOL_MAX_DIMENSIONS` dimensions.
    /// Coordinates are drawn in `f32` before denormalization, so each carries
    /// 24 bits of resolution.
    Sobol,

    /// One linear sweep applied to all parameters in lockstep
    Uniform,
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        SamplingStrategy::Lhs
    }
}

impl SamplingStrategy {
    /// Lowercase name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingStrategy::Random => "random",
            SamplingStrategy::Grid => "grid",
            SamplingStrategy::Lhs => "lhs",
            SamplingStrategy::Sobol => "sobol",
            SamplingStrategy::Uniform => "uniform",
        }
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingStrategy {
    type Err = ParamOptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(SamplingStrategy::Random),
            "grid" => Ok(SamplingStrategy::Grid),
            "lhs" => Ok(SamplingStrategy::Lhs),
            "sobol" => Ok(SamplingStrategy::Sobol),
            "uniform" => Ok(SamplingStrategy::Uniform),
            _ => Err(ParamOptError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Draws candidate parameter sets from a parameter space.
///
/// # Examples
///
/// ```
/// use paramopt_rs::parameters::ParameterSpace;
/// use paramopt_rs::sampling::{ParameterSampler, SamplingStrategy};
///
/// let mut space = ParameterSpace::new();
/// space.add_parameter("x", 0.0, 10.0, None, "").unwrap();
/// space.add_parameter("y", -1.0, 1.0, None, "").unwrap();
///
/// let sampler = ParameterSampler::new(&space);
/// let samples = sampler.sample(8, SamplingStrategy::Lhs, Some(42)).unwrap();
/// assert_eq!(samples.len(), 8);
/// assert!(samples.iter().all(|s| (0.0..=10.0).contains(&s["x"])));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParameterSampler<'a> {
    space: &'a ParameterSpace,
}

impl<'a> ParameterSampler<'a> {
    /// Create a sampler over the given space
    pub fn new(space: &'a ParameterSpace) -> Self {
        Self { space }
    }

    /// The space this sampler draws from
    pub fn space(&self) -> &ParameterSpace {
        self.space
    }

    /// Draw `n_samples` parameter sets
    ///
    /// # Arguments
    ///
    /// * `n_samples` - Number of parameter sets to return
    /// * `strategy` - How points are placed in the unit hypercube
    /// * `seed` - Seed for the underlying generator; `None` draws from entropy
    ///
    /// # Returns
    ///
    /// `n_samples` parameter sets in canonical parameter order
    pub fn sample(
        &self,
        n_samples: usize,
        strategy: SamplingStrategy,
        seed: Option<u64>,
    ) -> Result<Vec<ParameterSet>> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.sample_with_rng(n_samples, strategy, &mut rng)
    }

    /// Draw `n_samples` parameter sets using the given random generator
    pub fn sample_with_rng<R: Rng + ?Sized>(
        &self,
        n_samples: usize,
        strategy: SamplingStrategy,
        rng: &mut R,
    ) -> Result<Vec<ParameterSet>> {
        let unit = self.sample_unit(n_samples, strategy, rng)?;
        Ok(self.denormalize_rows(&unit))
    }

    /// Draw the normalized `n_samples x n_params` design without mapping it
    /// back onto the parameter ranges
    pub fn sample_unit<R: Rng + ?Sized>(
        &self,
        n_samples: usize,
        strategy: SamplingStrategy,
        rng: &mut R,
    ) -> Result<Array2<f64>> {
        let n_params = self.space.len();

        let unit = match strategy {
            SamplingStrategy::Random => hypercube::random(n_samples, n_params, rng),
            SamplingStrategy::Uniform => hypercube::uniform_sweep(n_samples, n_params),
            SamplingStrategy::Lhs => hypercube::latin_hypercube(n_samples, n_params, rng),
            SamplingStrategy::Sobol => hypercube::sobol(n_samples, n_params, rng.gen())?,
            SamplingStrategy::Grid => hypercube::full_factorial_grid(n_samples, n_params),
        };

        tracing::debug!(
            target: "paramopt",
            strategy = %strategy,
            n_samples,
            n_params,
            "drew unit design"
        );

        Ok(unit)
    }

    /// Map each row of a unit design onto the parameter ranges
    ///
    /// Column `j` goes through the `j`-th parameter's `denormalize`.
    pub fn denormalize_rows(&self, unit: &Array2<f64>) -> Vec<ParameterSet> {
        unit.rows()
            .into_iter()
            .map(|row| {
                self.space
                    .iter()
                    .zip(row.iter())
                    .map(|(bound, &u)| (bound.name().to_string(), bound.denormalize(u)))
                    .collect()
            })
            .collect()
    }
}
