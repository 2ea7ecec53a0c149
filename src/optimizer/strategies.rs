//! The three boundary-adjustment methods.

use indexmap::IndexMap;

use crate::optimizer::{
    satisfies_constraints, AdjustmentConfig, AdjustmentOutcome, ParameterOptimizer, SkipReason,
};
use crate::parameters::{ParameterSet, ParameterSpace};

#[cfg(feature = "regression")]
use {
    crate::sampling::{ParameterSampler, SamplingStrategy},
    crate::surrogate::GaussianProcess,
    ndarray::{Array1, Array2},
    rand::rngs::StdRng,
    rand::{Rng, SeedableRng},
};

impl ParameterOptimizer {
    pub(super) fn adjust_by_best_performance(
        &self,
        space: &mut ParameterSpace,
        config: &AdjustmentConfig,
    ) -> AdjustmentOutcome {
        let Some(index) = self.find_best_result(&config.target_outputs, &config.tolerance) else {
            tracing::warn!(
                target: "paramopt",
                "no record with a finite error score, keeping current bounds"
            );
            return AdjustmentOutcome::Skipped(SkipReason::NoScorableRecord);
        };

        let center = self.history[index].parameters.clone();
        space.shrink_boundaries(config.shrink_factor, Some(&center));

        tracing::info!(
            target: "paramopt",
            record = index,
            ?center,
            shrink_factor = config.shrink_factor,
            "shrunk boundaries around best result"
        );

        AdjustmentOutcome::Shrunk { center }
    }

    pub(super) fn adjust_by_constraint(
        &self,
        space: &mut ParameterSpace,
        config: &AdjustmentConfig,
    ) -> AdjustmentOutcome {
        let passing: Vec<&ParameterSet> = self
            .history
            .iter()
            .filter(|r| satisfies_constraints(&r.outputs, &config.target_outputs, &config.tolerance))
            .map(|r| &r.parameters)
            .collect();

        if passing.is_empty() {
            tracing::warn!(
                target: "paramopt",
                "no results satisfy the constraints, keeping current bounds"
            );
            return AdjustmentOutcome::Skipped(SkipReason::NoSatisfyingRecord);
        }

        let mut bounds: IndexMap<String, (f64, f64)> = IndexMap::new();
        for bound in space.iter() {
            let values = passing.iter().filter_map(|p| p.get(bound.name()).copied());
            let Some((lo, hi)) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            }) else {
                continue;
            };

            let margin = (hi - lo) * config.constraint_margin;
            bounds.insert(
                bound.name().to_string(),
                ((lo - margin).max(bound.min()), (hi + margin).min(bound.max())),
            );
        }

        // Degenerate spans (a single satisfying value) are rejected and
        // logged by the space.
        space.update_boundaries(&bounds);

        tracing::info!(
            target: "paramopt",
            n_satisfying = passing.len(),
            ?bounds,
            "updated boundaries from satisfying results"
        );

        AdjustmentOutcome::Bounded { bounds }
    }

    #[cfg(not(feature = "regression"))]
    pub(super) fn adjust_by_regression(
        &self,
        space: &mut ParameterSpace,
        config: &AdjustmentConfig,
    ) -> AdjustmentOutcome {
        tracing::warn!(
            target: "paramopt",
            "built without the regression feature, using best_performance"
        );
        self.adjust_by_best_performance(space, config)
    }

    #[cfg(feature = "regression")]
    pub(super) fn adjust_by_regression(
        &self,
        space: &mut ParameterSpace,
        config: &AdjustmentConfig,
    ) -> AdjustmentOutcome {
        if self.history.len() < config.regression_min_history {
            tracing::warn!(
                target: "paramopt",
                n_records = self.history.len(),
                required = config.regression_min_history,
                "not enough history for regression, using best_performance"
            );
            return self.adjust_by_best_performance(space, config);
        }

        if config.target_outputs.is_empty() {
            tracing::warn!(
                target: "paramopt",
                "no target outputs for regression, keeping current bounds"
            );
            return AdjustmentOutcome::Skipped(SkipReason::NoTargets);
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let x = feature_matrix(space, self.history.iter().map(|r| &r.parameters));

        let mut predicted: Vec<ParameterSet> = Vec::with_capacity(config.target_outputs.len());
        for (output, &target) in &config.target_outputs {
            let y: Array1<f64> = self
                .history
                .iter()
                .map(|r| r.outputs.get(output).copied().unwrap_or(0.0))
                .collect();

            let gp = match GaussianProcess::fit(&x, &y, &config.gp, &mut rng) {
                Ok(gp) => gp,
                Err(err) => {
                    tracing::warn!(
                        target: "paramopt",
                        output = output.as_str(),
                        error = %err,
                        "surrogate fit failed, skipping output"
                    );
                    continue;
                }
            };

            predicted.push(optimize_for_target(
                &gp,
                space,
                target,
                config.regression_candidates,
                &mut rng,
            ));
        }

        if predicted.is_empty() {
            tracing::warn!(
                target: "paramopt",
                "no surrogate could be fitted, using best_performance"
            );
            return self.adjust_by_best_performance(space, config);
        }

        let center: ParameterSet = space
            .names()
            .map(|name| {
                let sum: f64 = predicted
                    .iter()
                    .map(|p| p.get(name).copied().unwrap_or(0.0))
                    .sum();
                (name.to_string(), sum / predicted.len() as f64)
            })
            .collect();

        space.shrink_boundaries(config.shrink_factor, Some(&center));

        tracing::info!(
            target: "paramopt",
            n_outputs = predicted.len(),
            ?center,
            shrink_factor = config.shrink_factor,
            "shrunk boundaries around regression optimum"
        );

        AdjustmentOutcome::Shrunk { center }
    }
}

/// Stack parameter sets into an `n x d` matrix in canonical order
#[cfg(feature = "regression")]
fn feature_matrix<'a>(
    space: &ParameterSpace,
    sets: impl ExactSizeIterator<Item = &'a ParameterSet>,
) -> Array2<f64> {
    let n_rows = sets.len();
    let data: Vec<f64> = sets.flat_map(|set| space.feature_row(set)).collect();
    Array2::from_shape_vec((n_rows, space.len()), data)
        .unwrap_or_else(|_| Array2::zeros((n_rows, space.len())))
}

/// Candidate whose predicted output best matches `target`
///
/// Candidates are a Latin hypercube over the current bounds, scored by
/// `|mean - target| - std`. The first minimum wins; with no candidates the
/// space's current values are returned.
#[cfg(feature = "regression")]
fn optimize_for_target<R: Rng + ?Sized>(
    gp: &GaussianProcess,
    space: &ParameterSpace,
    target: f64,
    n_candidates: usize,
    rng: &mut R,
) -> ParameterSet {
    let sampler = ParameterSampler::new(space);
    let candidates = match sampler.sample_with_rng(n_candidates, SamplingStrategy::Lhs, rng) {
        Ok(candidates) if !candidates.is_empty() => candidates,
        _ => return space.get_current_values(),
    };

    let x = feature_matrix(space, candidates.iter());
    let (mean, std) = gp.predict_batch(&x);

    let mut best_index = None;
    let mut best_error = f64::INFINITY;
    for (i, (&m, &s)) in mean.iter().zip(std.iter()).enumerate() {
        let error = (m - target).abs() - s;
        if error < best_error {
            best_error = error;
            best_index = Some(i);
        }
    }

    match best_index {
        Some(i) => candidates[i].clone(),
        None => space.get_current_values(),
    }
}
