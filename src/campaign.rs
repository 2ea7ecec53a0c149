//! Iterative sample / evaluate / adjust loop.
//!
//! A [`Campaign`] repeatedly draws parameter sets from the current bounds,
//! evaluates them through a [`SimulationExecutor`], records the results and
//! narrows the space. It stops early as soon as any recorded result lies
//! within tolerance of every target.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{ParamOptError, Result};
use crate::manager::SimulationParameterManager;
use crate::optimizer::{AdjustmentConfig, HistoryTable, OutputSet};
use crate::parameters::{ParameterSet, ParameterSpace};
use crate::sampling::SamplingStrategy;

/// Evaluates one parameter set.
///
/// Implemented for any `Fn(&ParameterSet) -> Result<OutputSet>`.
pub trait SimulationExecutor {
    /// Run the simulation and return its named outputs
    fn evaluate(&self, parameters: &ParameterSet) -> Result<OutputSet>;
}

impl<F> SimulationExecutor for F
where
    F: Fn(&ParameterSet) -> Result<OutputSet>,
{
    fn evaluate(&self, parameters: &ParameterSet) -> Result<OutputSet> {
        self(parameters)
    }
}

/// Settings for a [`Campaign`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// Maximum number of iterations. Default: 5
    pub iterations: usize,

    /// Parameter sets evaluated per iteration. Default: 10
    pub samples_per_iteration: usize,

    /// Sampling strategy. Default: lhs
    pub strategy: SamplingStrategy,

    /// Base seed; iteration `i` samples with `seed + i`. `None` draws from
    /// entropy
    pub seed: Option<u64>,

    /// Evaluate the samples of one iteration on the rayon pool
    pub parallel_evaluation: bool,

    /// Targets, tolerances and adjustment method
    pub adjustment: AdjustmentConfig,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            samples_per_iteration: 10,
            strategy: SamplingStrategy::Lhs,
            seed: None,
            parallel_evaluation: false,
            adjustment: AdjustmentConfig::default(),
        }
    }
}

impl CampaignConfig {
    /// Create a configuration with the given adjustment settings
    pub fn new(adjustment: AdjustmentConfig) -> Self {
        Self {
            adjustment,
            ..Self::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the number of samples per iteration
    pub fn with_samples_per_iteration(mut self, n: usize) -> Self {
        self.samples_per_iteration = n;
        self
    }

    /// Set the sampling strategy
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable parallel evaluation
    pub fn with_parallel_evaluation(mut self, parallel: bool) -> Self {
        self.parallel_evaluation = parallel;
        self
    }

    /// Check that the loop would do any work
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ParamOptError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.samples_per_iteration == 0 {
            return Err(ParamOptError::InvalidConfig(
                "samples_per_iteration must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Save the configuration to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize the configuration to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Summary of a finished campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignReport {
    /// Iterations started before stopping
    pub iterations_run: usize,

    /// Parameters of the first result within tolerance of every target
    pub achieved: Option<ParameterSet>,

    /// Evaluations that returned an error and were not recorded
    pub failed_evaluations: usize,

    /// Bounds at the end of the campaign
    pub final_space: ParameterSpace,

    /// Every recorded result
    pub history: HistoryTable,
}

/// Drives a [`SimulationParameterManager`] with a [`SimulationExecutor`].
///
/// # Examples
///
/// ```
/// use paramopt_rs::campaign::{Campaign, CampaignConfig};
/// use paramopt_rs::optimizer::{AdjustmentConfig, OutputSet};
/// use paramopt_rs::parameters::{ParameterSet, ParameterSpace};
///
/// let mut space = ParameterSpace::new();
/// space.add_parameter("x", 0.0, 10.0, None, "").unwrap();
///
/// let executor = |p: &ParameterSet| -> paramopt_rs::Result<OutputSet> {
///     Ok([("out".to_string(), p["x"] * p["x"])].into_iter().collect())
/// };
///
/// let adjustment = AdjustmentConfig::default()
///     .with_target("out", 25.0)
///     .with_tolerance("out", 5.0);
/// let config = CampaignConfig::new(adjustment).with_seed(3);
///
/// let mut campaign = Campaign::new(space, executor, config).unwrap();
/// let report = campaign.run().unwrap();
/// assert!(report.achieved.is_some());
/// ```
pub struct Campaign<E> {
    manager: SimulationParameterManager,
    executor: E,
    config: CampaignConfig,
}

impl<E> Campaign<E>
where
    E: SimulationExecutor + Sync,
{
    /// Create a campaign over `space`
    pub fn new(space: ParameterSpace, executor: E, config: CampaignConfig) -> Result<Self> {
        Self::with_manager(SimulationParameterManager::new(space), executor, config)
    }

    /// Create a campaign that continues from an existing manager
    pub fn with_manager(
        manager: SimulationParameterManager,
        executor: E,
        config: CampaignConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            manager,
            executor,
            config,
        })
    }

    /// The campaign settings
    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    /// The underlying manager
    pub fn manager(&self) -> &SimulationParameterManager {
        &self.manager
    }

    /// Consume the campaign and return its manager
    pub fn into_manager(self) -> SimulationParameterManager {
        self.manager
    }

    /// Run the loop until a target is met or the iterations are exhausted
    ///
    /// Each iteration samples from the current bounds, evaluates every
    /// sample, records successful evaluations with the targets, and stops if
    /// any recorded result satisfies all tolerances. Otherwise, unless it is
    /// the last iteration, the bounds are adjusted.
    ///
    /// # Returns
    ///
    /// A report of the run, or an error if sampling fails
    pub fn run(&mut self) -> Result<CampaignReport> {
        let adjustment = &self.config.adjustment;
        let mut failed_evaluations = 0;
        let mut achieved = None;
        let mut iterations_run = 0;

        for iteration in 0..self.config.iterations {
            iterations_run = iteration + 1;
            tracing::info!(
                target: "paramopt",
                iteration = iterations_run,
                total = self.config.iterations,
                "starting iteration"
            );

            let samples = match self.config.seed {
                Some(seed) => self.manager.get_next_parameters_seeded(
                    self.config.samples_per_iteration,
                    self.config.strategy,
                    seed.wrapping_add(iteration as u64),
                )?,
                None => self
                    .manager
                    .get_next_parameters(self.config.samples_per_iteration, self.config.strategy)?,
            };

            let results = self.evaluate_all(&samples);

            for (params, result) in samples.iter().zip(results) {
                match result {
                    Ok(outputs) => {
                        self.manager.set_current_parameters(params);
                        self.manager.record_simulation_result(
                            params,
                            &outputs,
                            Some(&adjustment.target_outputs),
                        );
                        tracing::debug!(target: "paramopt", ?params, ?outputs, "recorded result");
                    }
                    Err(err) => {
                        failed_evaluations += 1;
                        tracing::warn!(
                            target: "paramopt",
                            ?params,
                            error = %err,
                            "simulation failed, result not recorded"
                        );
                    }
                }
            }

            if let Some(params) = self
                .manager
                .optimizer()
                .first_satisfying(&adjustment.target_outputs, &adjustment.tolerance)
            {
                tracing::info!(target: "paramopt", ?params, "target achieved");
                achieved = Some(params.clone());
                break;
            }

            if iteration + 1 < self.config.iterations {
                self.manager.optimize_with_config(adjustment);
            }
        }

        if achieved.is_none() {
            tracing::info!(
                target: "paramopt",
                iterations = iterations_run,
                "target not achieved"
            );
        }

        Ok(CampaignReport {
            iterations_run,
            achieved,
            failed_evaluations,
            final_space: self.manager.space().clone(),
            history: self.manager.get_history(),
        })
    }

    fn evaluate_all(&self, samples: &[ParameterSet]) -> Vec<Result<OutputSet>> {
        if self.config.parallel_evaluation {
            samples
                .par_iter()
                .map(|params| self.executor.evaluate(params))
                .collect()
        } else {
            samples
                .iter()
                .map(|params| self.executor.evaluate(params))
                .collect()
        }
    }
}
