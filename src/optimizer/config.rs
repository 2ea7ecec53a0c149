//! Boundary-adjustment methods and their settings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ParamOptError, Result};
use crate::surrogate::GpConfig;

/// Named output values, e.g. simulation outputs, targets or tolerances.
pub type OutputSet = IndexMap<String, f64>;

/// How the next parameter region is chosen from the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentMethod {
    /// Shrink around the record with the lowest tolerance-weighted error
    BestPerformance,

    /// Shrink around optima predicted by a surrogate model per output
    Regression,

    /// Fit the ranges to the records that satisfy every tolerance
    Constraint,
}

impl Default for AdjustmentMethod {
    fn default() -> Self {
        AdjustmentMethod::BestPerformance
    }
}

impl AdjustmentMethod {
    /// Snake-case name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentMethod::BestPerformance => "best_performance",
            AdjustmentMethod::Regression => "regression",
            AdjustmentMethod::Constraint => "constraint",
        }
    }
}

impl fmt::Display for AdjustmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentMethod {
    type Err = ParamOptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best_performance" => Ok(AdjustmentMethod::BestPerformance),
            "regression" => Ok(AdjustmentMethod::Regression),
            "constraint" => Ok(AdjustmentMethod::Constraint),
            _ => Err(ParamOptError::UnknownMethod(s.to_string())),
        }
    }
}

/// Settings for one boundary adjustment.
///
/// # Examples
///
/// ```
/// use paramopt_rs::optimizer::{AdjustmentConfig, AdjustmentMethod};
///
/// let config = AdjustmentConfig::default()
///     .with_target("out", 4.0)
///     .with_tolerance("out", 1.0)
///     .with_shrink_factor(0.5)
///     .with_method(AdjustmentMethod::Constraint);
///
/// assert_eq!(config.target_outputs["out"], 4.0);
/// assert_eq!(config.regression_candidates, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentConfig {
    /// Desired value per output
    pub target_outputs: OutputSet,

    /// Acceptable absolute deviation per output
    pub tolerance: OutputSet,

    /// Width multiplier for shrinking methods. Default: 0.8
    pub shrink_factor: f64,

    /// Adjustment method. Default: best_performance
    pub method: AdjustmentMethod,

    /// Latin-hypercube candidates scored per output by the regression method.
    /// Default: 100
    pub regression_candidates: usize,

    /// Records needed before the regression method fits a model; below this
    /// it falls back to best_performance. Default: 5
    pub regression_min_history: usize,

    /// Relative margin added on both sides of the satisfying range by the
    /// constraint method. Default: 0.1
    pub constraint_margin: f64,

    /// Surrogate hyperparameter search
    pub gp: GpConfig,

    /// Seed for regression candidates and model restarts; `None` draws from
    /// entropy
    pub seed: Option<u64>,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            target_outputs: OutputSet::new(),
            tolerance: OutputSet::new(),
            shrink_factor: 0.8,
            method: AdjustmentMethod::default(),
            regression_candidates: 100,
            regression_min_history: 5,
            constraint_margin: 0.1,
            gp: GpConfig::default(),
            seed: None,
        }
    }
}

impl AdjustmentConfig {
    /// Create a configuration for the given targets and tolerances
    pub fn new(target_outputs: OutputSet, tolerance: OutputSet) -> Self {
        Self {
            target_outputs,
            tolerance,
            ..Self::default()
        }
    }

    /// Add or replace the target of one output
    pub fn with_target(mut self, output: impl Into<String>, value: f64) -> Self {
        self.target_outputs.insert(output.into(), value);
        self
    }

    /// Add or replace the tolerance of one output
    pub fn with_tolerance(mut self, output: impl Into<String>, value: f64) -> Self {
        self.tolerance.insert(output.into(), value);
        self
    }

    /// Set the shrink factor
    pub fn with_shrink_factor(mut self, shrink_factor: f64) -> Self {
        self.shrink_factor = shrink_factor;
        self
    }

    /// Set the adjustment method
    pub fn with_method(mut self, method: AdjustmentMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the number of regression candidates
    pub fn with_regression_candidates(mut self, n: usize) -> Self {
        self.regression_candidates = n;
        self
    }

    /// Set the minimum history for the regression method
    pub fn with_regression_min_history(mut self, n: usize) -> Self {
        self.regression_min_history = n;
        self
    }

    /// Set the constraint margin
    pub fn with_constraint_margin(mut self, margin: f64) -> Self {
        self.constraint_margin = margin;
        self
    }

    /// Set the surrogate settings
    pub fn with_gp(mut self, gp: GpConfig) -> Self {
        self.gp = gp;
        self
    }

    /// Seed the regression method
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
