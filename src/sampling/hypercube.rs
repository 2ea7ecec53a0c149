//! Unit-hypercube designs.
//!
//! Every generator returns an `n_samples x n_dims` matrix with entries in
//! `[0, 1]`. Column `j` is later mapped through the `j`-th parameter of the
//! space. Randomised designs take the RNG explicitly so that callers control
//! reproducibility.

use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ParamOptError, Result};

/// Largest dimension supported by the Sobol generator.
pub const SOBOL_MAX_DIMENSIONS: usize = sobol_burley::NUM_DIMENSIONS as usize;

/// Largest number of points the Sobol generator can index (`2^16`).
pub const SOBOL_MAX_SAMPLES: usize = 1 << 16;

/// Independent uniform draws for every cell.
pub fn random<R: Rng + ?Sized>(n_samples: usize, n_dims: usize, rng: &mut R) -> Array2<f64> {
    Array2::from_shape_simple_fn((n_samples, n_dims), || rng.gen::<f64>())
}

/// Evenly spaced fractions `0, 1/(n-1), ..., 1`.
///
/// A single sample sits at 0, matching a one-point linspace.
pub fn linspace(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = 1.0 / (n - 1) as f64;
            (0..n).map(|i| (i as f64 * step).min(1.0)).collect()
        }
    }
}

/// One linear sweep replicated across every column.
///
/// All dimensions receive the same fraction for a given row, so the design is
/// the diagonal of the hypercube rather than a grid.
pub fn uniform_sweep(n_samples: usize, n_dims: usize) -> Array2<f64> {
    let column = linspace(n_samples);
    Array2::from_shape_fn((n_samples, n_dims), |(i, _)| column[i])
}

/// Latin hypercube design.
///
/// Each dimension is split into `n_samples` equal bins. Every bin of every
/// dimension receives exactly one point, placed uniformly at random inside the
/// bin, and the bin order is permuted independently per dimension.
pub fn latin_hypercube<R: Rng + ?Sized>(
    n_samples: usize,
    n_dims: usize,
    rng: &mut R,
) -> Array2<f64> {
    let mut samples = Array2::<f64>::zeros((n_samples, n_dims));
    if n_samples == 0 {
        return samples;
    }

    let n = n_samples as f64;
    let mut strata: Vec<usize> = (0..n_samples).collect();

    for j in 0..n_dims {
        strata.shuffle(rng);
        for (i, &stratum) in strata.iter().enumerate() {
            let jitter: f64 = rng.gen();
            // Keep the point inside its own bin even if jitter rounds up
            samples[[i, j]] = ((stratum as f64 + jitter) / n).min((stratum as f64 + 1.0) / n);
        }
    }

    samples
}

/// Scrambled Sobol low-discrepancy sequence.
///
/// Points are taken from index 0 onward; `scramble_seed` selects the Owen
/// scrambling so that different seeds give independent sequences. Values are
/// generated in `f32`, so each coordinate carries 24 bits of resolution.
pub fn sobol(n_samples: usize, n_dims: usize, scramble_seed: u32) -> Result<Array2<f64>> {
    if n_dims > SOBOL_MAX_DIMENSIONS {
        return Err(ParamOptError::SamplingError(format!(
            "Sobol sequences support at most {} dimensions, got {}",
            SOBOL_MAX_DIMENSIONS, n_dims
        )));
    }
    if n_samples > SOBOL_MAX_SAMPLES {
        return Err(ParamOptError::SamplingError(format!(
            "Sobol sequences support at most {} points, got {}",
            SOBOL_MAX_SAMPLES, n_samples
        )));
    }

    Ok(Array2::from_shape_fn((n_samples, n_dims), |(i, j)| {
        f64::from(sobol_burley::sample(i as u32, j as u32, scramble_seed))
    }))
}

/// Number of grid levels per dimension: the smallest `k` with `k^n_dims >= n_samples`.
pub fn grid_levels(n_samples: usize, n_dims: usize) -> usize {
    if n_samples <= 1 || n_dims == 0 {
        return n_samples.min(1);
    }

    let target = n_samples as u128;
    let covers = |k: usize| -> bool {
        let mut total: u128 = 1;
        for _ in 0..n_dims {
            total = total.saturating_mul(k as u128);
            if total >= target {
                return true;
            }
        }
        total >= target
    };

    // Start from the floating-point root and correct rounding in either direction
    let mut k = ((n_samples as f64).powf(1.0 / n_dims as f64).round() as usize).max(1);
    while k > 1 && covers(k - 1) {
        k -= 1;
    }
    while !covers(k) {
        k += 1;
    }
    k
}

/// Full factorial grid truncated to the first `n_samples` points.
///
/// Each dimension uses `grid_levels(n_samples, n_dims)` evenly spaced levels on
/// `[0, 1]`. Points follow Cartesian (`xy`) meshgrid order: the second
/// dimension varies slowest, then the first, then the third onward with the
/// last fastest. With two dimensions the first one therefore varies fastest.
/// Only the leading `n_samples` points are kept, so the result is a prefix of
/// the grid, not a balanced subsample.
pub fn full_factorial_grid(n_samples: usize, n_dims: usize) -> Array2<f64> {
    if n_dims == 0 {
        return Array2::zeros((n_samples, 0));
    }

    let levels_per_dim = grid_levels(n_samples, n_dims);
    let levels = linspace(levels_per_dim);

    Array2::from_shape_fn((n_samples, n_dims), |(i, j)| {
        let rank = xy_axis_rank(j, n_dims);
        let stride = levels_per_dim.saturating_pow((n_dims - 1 - rank) as u32);
        levels[(i / stride) % levels_per_dim]
    })
}

/// Position of dimension `j` in the xy meshgrid axis order `(1, 0, 2, ..., d-1)`,
/// counted from the slowest axis.
fn xy_axis_rank(j: usize, n_dims: usize) -> usize {
    match j {
        0 if n_dims > 1 => 1,
        1 => 0,
        _ => j,
    }
}
