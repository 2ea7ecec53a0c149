//! Gaussian-process regression with a constant × RBF kernel.
//!
//! The kernel is `k(a, b) = c · exp(-‖a − b‖² / (2ℓ²))` with amplitude `c` and a
//! single isotropic length scale `ℓ`. A small jitter is added to the diagonal
//! of the training covariance. The prior mean is zero and targets are used as
//! given.
//!
//! Hyperparameters are chosen by maximising the log marginal likelihood
//!
//! `log p(y | X) = −½ yᵀα − Σ log Lᵢᵢ − (n/2) log 2π`
//!
//! in log-parameter space, from the initial guess plus `n_restarts` log-uniform
//! random starts. Each start runs a bounded compass search; the restarts run
//! in parallel and the best likelihood wins (earliest start on ties).

use nalgebra::linalg::Cholesky;
use nalgebra::{DVector, Dyn};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::Rng;
use rayon::prelude::*;

use crate::error::{ParamOptError, Result};
use crate::surrogate::GpConfig;
use crate::utils::{nalgebra_vec_to_ndarray, ndarray_to_nalgebra, ndarray_vec_to_nalgebra};

/// Smallest compass step (in log space) before a local search stops.
const MIN_LOG_STEP: f64 = 1e-3;

/// Upper limit on compass iterations per start.
const MAX_SEARCH_ITERATIONS: usize = 200;

/// Cholesky factorisation of the training covariance for one hyperparameter pair.
struct Factorization {
    cholesky: Cholesky<f64, Dyn>,
    alpha: DVector<f64>,
    log_marginal_likelihood: f64,
}

/// A fitted Gaussian-process regressor.
///
/// # Examples
///
/// ```
/// use ndarray::{array, Array2};
/// use paramopt_rs::surrogate::{GaussianProcess, GpConfig};
/// use rand::SeedableRng;
///
/// let x: Array2<f64> = array![[0.0], [1.0], [2.0], [3.0]];
/// let y = array![0.0, 1.0, 4.0, 9.0];
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
///
/// let gp = GaussianProcess::fit(&x, &y, &GpConfig::default(), &mut rng).unwrap();
/// let (mean, _std) = gp.predict(array![2.0].view());
/// assert!((mean - 4.0).abs() < 0.1);
/// ```
pub struct GaussianProcess {
    x_train: Array2<f64>,
    amplitude: f64,
    length_scale: f64,
    factorization: Factorization,
}

impl std::fmt::Debug for GaussianProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaussianProcess")
            .field("n_train", &self.x_train.nrows())
            .field("amplitude", &self.amplitude)
            .field("length_scale", &self.length_scale)
            .field(
                "log_marginal_likelihood",
                &self.factorization.log_marginal_likelihood,
            )
            .finish()
    }
}

fn rbf(a: ArrayView1<f64>, b: ArrayView1<f64>, amplitude: f64, length_scale: f64) -> f64 {
    let sq_dist: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
    amplitude * (-0.5 * sq_dist / (length_scale * length_scale)).exp()
}

/// Cross-covariance matrix between the rows of `a` and the rows of `b`.
fn kernel_matrix(a: &Array2<f64>, b: &Array2<f64>, amplitude: f64, length_scale: f64) -> Array2<f64> {
    Array2::from_shape_fn((a.nrows(), b.nrows()), |(i, j)| {
        rbf(a.row(i), b.row(j), amplitude, length_scale)
    })
}

fn factorize(
    x: &Array2<f64>,
    y: &DVector<f64>,
    amplitude: f64,
    length_scale: f64,
    jitter: f64,
) -> Option<Factorization> {
    let n = x.nrows();
    let mut k = kernel_matrix(x, x, amplitude, length_scale);
    for i in 0..n {
        k[[i, i]] += jitter;
    }

    let cholesky = Cholesky::new(ndarray_to_nalgebra(&k))?;
    let alpha = cholesky.solve(y);

    let half_log_det: f64 = cholesky.l_dirty().diagonal().iter().map(|d| d.ln()).sum();
    let log_marginal_likelihood = -0.5 * y.dot(&alpha)
        - half_log_det
        - 0.5 * n as f64 * (2.0 * std::f64::consts::PI).ln();

    if !log_marginal_likelihood.is_finite() {
        return None;
    }

    Some(Factorization {
        cholesky,
        alpha,
        log_marginal_likelihood,
    })
}

/// Bounded compass search on the log hyperparameters from one start point.
fn local_search(
    x: &Array2<f64>,
    y: &DVector<f64>,
    start: [f64; 2],
    log_bounds: &[(f64, f64); 2],
    jitter: f64,
) -> Option<([f64; 2], Factorization)> {
    let clamp = |theta: [f64; 2]| {
        [
            theta[0].clamp(log_bounds[0].0, log_bounds[0].1),
            theta[1].clamp(log_bounds[1].0, log_bounds[1].1),
        ]
    };

    let mut theta = clamp(start);
    let mut best = factorize(x, y, theta[0].exp(), theta[1].exp(), jitter)?;
    let mut step = 1.0;

    for _ in 0..MAX_SEARCH_ITERATIONS {
        if step < MIN_LOG_STEP {
            break;
        }

        let mut improved = false;
        for dim in 0..2 {
            for direction in [1.0, -1.0] {
                let mut candidate = theta;
                candidate[dim] += direction * step;
                let candidate = clamp(candidate);
                if candidate == theta {
                    continue;
                }

                if let Some(fit) = factorize(x, y, candidate[0].exp(), candidate[1].exp(), jitter) {
                    if fit.log_marginal_likelihood > best.log_marginal_likelihood {
                        theta = candidate;
                        best = fit;
                        improved = true;
                    }
                }
            }
        }

        if !improved {
            step *= 0.5;
        }
    }

    Some((theta, best))
}

impl GaussianProcess {
    /// Fit the regressor to training data
    ///
    /// # Arguments
    ///
    /// * `x` - Training inputs, one row per observation
    /// * `y` - Training targets
    /// * `config` - Hyperparameter search settings
    /// * `rng` - Source of the random restart points
    ///
    /// # Returns
    ///
    /// The fitted model, or an error if the data are empty, the shapes
    /// disagree, or no hyperparameter pair yields a positive-definite covariance
    pub fn fit<R: Rng + ?Sized>(
        x: &Array2<f64>,
        y: &Array1<f64>,
        config: &GpConfig,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;

        if x.nrows() == 0 {
            return Err(ParamOptError::SurrogateError(
                "cannot fit a Gaussian process to zero observations".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(ParamOptError::DimensionMismatch(format!(
                "{} input rows but {} targets",
                x.nrows(),
                y.len()
            )));
        }

        let y_vec = ndarray_vec_to_nalgebra(y.view());
        let log_bounds = config.log_bounds();

        let mut starts = Vec::with_capacity(config.n_restarts + 1);
        starts.push([config.initial_amplitude.ln(), config.initial_length_scale.ln()]);
        for _ in 0..config.n_restarts {
            starts.push([
                rng.gen_range(log_bounds[0].0..=log_bounds[0].1),
                rng.gen_range(log_bounds[1].0..=log_bounds[1].1),
            ]);
        }

        let results: Vec<Option<([f64; 2], Factorization)>> = starts
            .par_iter()
            .map(|&start| local_search(x, &y_vec, start, &log_bounds, config.jitter))
            .collect();

        let mut best: Option<([f64; 2], Factorization)> = None;
        for (theta, fit) in results.into_iter().flatten() {
            let better = match &best {
                Some((_, current)) => fit.log_marginal_likelihood > current.log_marginal_likelihood,
                None => true,
            };
            if better {
                best = Some((theta, fit));
            }
        }

        let (theta, factorization) = best.ok_or_else(|| {
            ParamOptError::SurrogateError(
                "covariance matrix is not positive definite for any hyperparameters".to_string(),
            )
        })?;

        tracing::debug!(
            target: "paramopt",
            n_train = x.nrows(),
            amplitude = theta[0].exp(),
            length_scale = theta[1].exp(),
            log_marginal_likelihood = factorization.log_marginal_likelihood,
            "fitted gaussian process"
        );

        Ok(Self {
            x_train: x.clone(),
            amplitude: theta[0].exp(),
            length_scale: theta[1].exp(),
            factorization,
        })
    }

    /// Fitted kernel amplitude
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Fitted RBF length scale
    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }

    /// Log marginal likelihood at the fitted hyperparameters
    pub fn log_marginal_likelihood(&self) -> f64 {
        self.factorization.log_marginal_likelihood
    }

    /// Posterior mean and standard deviation at one point
    pub fn predict(&self, x: ArrayView1<f64>) -> (f64, f64) {
        let point = x.to_owned().insert_axis(Axis(0));
        let (mean, std) = self.predict_batch(&point);
        (mean[0], std[0])
    }

    /// Posterior means and standard deviations for each row of `x`
    pub fn predict_batch(&self, x: &Array2<f64>) -> (Array1<f64>, Array1<f64>) {
        let k_star = ndarray_to_nalgebra(&kernel_matrix(
            x,
            &self.x_train,
            self.amplitude,
            self.length_scale,
        ));

        let mean = &k_star * &self.factorization.alpha;

        // v = K⁻¹ k*ᵀ, var = c − diag(k* v)
        let v = self.factorization.cholesky.solve(&k_star.transpose());
        let std = DVector::from_fn(x.nrows(), |i, _| {
            let explained = k_star.row(i).transpose().dot(&v.column(i));
            (self.amplitude - explained).max(0.0).sqrt()
        });

        (nalgebra_vec_to_ndarray(&mean), nalgebra_vec_to_ndarray(&std))
    }
}
