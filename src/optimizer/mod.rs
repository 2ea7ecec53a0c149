//! History-driven narrowing of the parameter space.
//!
//! [`ParameterOptimizer`] keeps an append-only log of evaluated parameter sets
//! and their outputs. From that log it narrows a [`ParameterSpace`] towards
//! the region where outputs approach their targets, using one of three
//! [`AdjustmentMethod`]s:
//!
//! - `best_performance` shrinks every range around the record with the lowest
//!   tolerance-weighted error.
//! - `regression` fits a Gaussian-process surrogate per target output, picks
//!   the candidate whose predicted output is closest to the target, and
//!   shrinks around the average of those picks.
//! - `constraint` sets each range to the span of the records that satisfy
//!   every tolerance, widened by a margin and clipped to the current range.
//!
//! Adjustments that find nothing to act on leave the space untouched and log
//! a warning; they never fail.

pub mod config;
pub mod history;
mod strategies;

use std::path::Path;

pub use config::{AdjustmentConfig, AdjustmentMethod, OutputSet};
pub use history::{HistoryRecord, HistoryRow, HistoryTable};

use crate::error::Result;
use crate::parameters::{ParameterSet, ParameterSpace};

/// Added to each tolerance in the error score so a zero tolerance stays finite
pub const TOLERANCE_EPSILON: f64 = 1e-10;

/// Tolerance assumed by the error score for outputs without one
pub const DEFAULT_SCORE_TOLERANCE: f64 = 1.0;

/// Why an adjustment left the space unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No records have been added
    EmptyHistory,

    /// No record has a finite error score
    NoScorableRecord,

    /// No record satisfies every tolerance
    NoSatisfyingRecord,

    /// No target outputs were given
    NoTargets,
}

/// What an adjustment did to the space
#[derive(Debug, Clone, PartialEq)]
pub enum AdjustmentOutcome {
    /// Ranges were shrunk around `center`
    Shrunk { center: ParameterSet },

    /// Ranges were replaced by `bounds`
    Bounded { bounds: indexmap::IndexMap<String, (f64, f64)> },

    /// The space was left unchanged
    Skipped(SkipReason),
}

impl AdjustmentOutcome {
    /// Whether the space was modified
    pub fn is_applied(&self) -> bool {
        !matches!(self, AdjustmentOutcome::Skipped(_))
    }
}

/// Tolerance-weighted distance of `outputs` from `target_outputs`
///
/// Sums `|output - target| / (tolerance + 1e-10)` over every target output
/// present in `outputs`. Targets without an observed output are skipped, and
/// outputs without a tolerance use a tolerance of 1.0.
///
/// # Examples
///
/// ```
/// use paramopt_rs::optimizer::{error_score, OutputSet};
///
/// let outputs: OutputSet = [("a".to_string(), 3.0)].into_iter().collect();
/// let targets: OutputSet = [("a".to_string(), 4.0), ("b".to_string(), 0.0)]
///     .into_iter()
///     .collect();
///
/// let score = error_score(&outputs, &targets, &OutputSet::new());
/// assert!((score - 1.0).abs() < 1e-9);
/// ```
pub fn error_score(outputs: &OutputSet, target_outputs: &OutputSet, tolerance: &OutputSet) -> f64 {
    target_outputs
        .iter()
        .filter_map(|(name, &target)| {
            let output = outputs.get(name)?;
            let tol = tolerance
                .get(name)
                .copied()
                .unwrap_or(DEFAULT_SCORE_TOLERANCE);
            Some((output - target).abs() / (tol + TOLERANCE_EPSILON))
        })
        .sum()
}

/// Whether every target output present in `outputs` lies within its tolerance
///
/// Targets without an observed output are ignored, and outputs without a
/// tolerance always pass.
pub fn satisfies_constraints(
    outputs: &OutputSet,
    target_outputs: &OutputSet,
    tolerance: &OutputSet,
) -> bool {
    target_outputs.iter().all(|(name, &target)| match outputs.get(name) {
        Some(&output) => {
            let tol = tolerance.get(name).copied().unwrap_or(f64::INFINITY);
            (output - target).abs() <= tol
        }
        None => true,
    })
}

/// Keeps the evaluation history and narrows parameter spaces from it.
///
/// # Examples
///
/// ```
/// use paramopt_rs::optimizer::{AdjustmentMethod, OutputSet, ParameterOptimizer};
/// use paramopt_rs::parameters::ParameterSpace;
///
/// let mut space = ParameterSpace::new();
/// space.add_parameter("x", 0.0, 10.0, Some(5.0), "").unwrap();
///
/// let mut optimizer = ParameterOptimizer::new();
/// for (x, out) in [(2.0, 1.0), (5.0, 5.0), (8.0, 9.0)] {
///     let params = [("x".to_string(), x)].into_iter().collect();
///     let outputs: OutputSet = [("out".to_string(), out)].into_iter().collect();
///     optimizer.add_result(&params, &outputs, None);
/// }
///
/// let target: OutputSet = [("out".to_string(), 4.0)].into_iter().collect();
/// let tolerance: OutputSet = [("out".to_string(), 1.0)].into_iter().collect();
/// optimizer.adjust_boundaries(&mut space, &target, &tolerance, 0.5, AdjustmentMethod::BestPerformance);
///
/// assert_eq!(space.get("x").unwrap().range(), (2.5, 7.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterOptimizer {
    history: Vec<HistoryRecord>,
}

impl ParameterOptimizer {
    /// Create an optimizer with an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an optimizer from existing records
    pub fn from_history(history: Vec<HistoryRecord>) -> Self {
        Self { history }
    }

    /// Append a record
    ///
    /// The maps are copied, so later changes by the caller do not alter the
    /// history.
    pub fn add_result(
        &mut self,
        parameters: &ParameterSet,
        outputs: &OutputSet,
        target_outputs: Option<&OutputSet>,
    ) {
        self.history.push(HistoryRecord::new(
            parameters.clone(),
            outputs.clone(),
            target_outputs.cloned(),
        ));
    }

    /// Append an owned record
    pub fn push_record(&mut self, record: HistoryRecord) {
        self.history.push(record);
    }

    /// All records in insertion order
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no records have been added
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Index of the record with the lowest error score
    ///
    /// Ties keep the earliest record. Returns `None` when the history is empty
    /// or no score is finite.
    pub fn find_best_result(&self, target_outputs: &OutputSet, tolerance: &OutputSet) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_score = f64::INFINITY;

        for (index, record) in self.history.iter().enumerate() {
            let score = error_score(&record.outputs, target_outputs, tolerance);
            if score < best_score {
                best_score = score;
                best = Some(index);
            }
        }

        best
    }

    /// Parameters of the first record that satisfies every tolerance
    pub fn first_satisfying(
        &self,
        target_outputs: &OutputSet,
        tolerance: &OutputSet,
    ) -> Option<&ParameterSet> {
        self.history
            .iter()
            .find(|record| satisfies_constraints(&record.outputs, target_outputs, tolerance))
            .map(|record| &record.parameters)
    }

    /// Narrow `space` using the default settings for everything but the
    /// arguments
    ///
    /// # Arguments
    ///
    /// * `space` - The space whose ranges are adjusted in place
    /// * `target_outputs` - Desired value per output
    /// * `tolerance` - Acceptable absolute deviation per output
    /// * `shrink_factor` - Width multiplier for the shrinking methods
    /// * `method` - How the new region is chosen
    ///
    /// # Returns
    ///
    /// What was done to the space
    pub fn adjust_boundaries(
        &self,
        space: &mut ParameterSpace,
        target_outputs: &OutputSet,
        tolerance: &OutputSet,
        shrink_factor: f64,
        method: AdjustmentMethod,
    ) -> AdjustmentOutcome {
        let config = AdjustmentConfig::new(target_outputs.clone(), tolerance.clone())
            .with_shrink_factor(shrink_factor)
            .with_method(method);
        self.adjust_with_config(space, &config)
    }

    /// Narrow `space` according to `config`
    pub fn adjust_with_config(
        &self,
        space: &mut ParameterSpace,
        config: &AdjustmentConfig,
    ) -> AdjustmentOutcome {
        if self.history.is_empty() {
            tracing::warn!(
                target: "paramopt",
                method = %config.method,
                "no history available for boundary adjustment"
            );
            return AdjustmentOutcome::Skipped(SkipReason::EmptyHistory);
        }

        tracing::debug!(
            target: "paramopt",
            method = %config.method,
            n_records = self.history.len(),
            shrink_factor = config.shrink_factor,
            "adjusting boundaries"
        );

        match config.method {
            AdjustmentMethod::BestPerformance => self.adjust_by_best_performance(space, config),
            AdjustmentMethod::Regression => self.adjust_by_regression(space, config),
            AdjustmentMethod::Constraint => self.adjust_by_constraint(space, config),
        }
    }

    /// Column-aligned export of the history
    pub fn history_table(&self) -> HistoryTable {
        HistoryTable::from_records(&self.history)
    }

    /// Save the history to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        history::save_records(&self.history, path)
    }

    /// Load a history from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_history(history::load_records(path)?))
    }

    /// Serialize the history to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.history)?)
    }

    /// Deserialize a history from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_history(serde_json::from_str(json)?))
    }
}
