//! Single entry point tying a parameter space to its sampler and optimizer.

use crate::error::Result;
use crate::optimizer::{
    AdjustmentConfig, AdjustmentMethod, AdjustmentOutcome, HistoryTable, OutputSet,
    ParameterOptimizer,
};
use crate::parameters::{ParameterSet, ParameterSpace};
use crate::sampling::{ParameterSampler, SamplingStrategy};

/// Owns a parameter space and the evaluation history used to narrow it.
///
/// Sampling always reads the space's current bounds, so every adjustment is
/// visible to the next call to [`get_next_parameters`](Self::get_next_parameters).
///
/// # Examples
///
/// ```
/// use paramopt_rs::manager::SimulationParameterManager;
/// use paramopt_rs::optimizer::{AdjustmentMethod, OutputSet};
/// use paramopt_rs::parameters::ParameterSpace;
/// use paramopt_rs::sampling::SamplingStrategy;
///
/// let mut space = ParameterSpace::new();
/// space.add_parameter("x", 0.0, 10.0, None, "mm").unwrap();
/// let mut manager = SimulationParameterManager::new(space);
///
/// for params in manager.get_next_parameters_seeded(4, SamplingStrategy::Lhs, 1).unwrap() {
///     let outputs: OutputSet = [("out".to_string(), params["x"] * 2.0)].into_iter().collect();
///     manager.record_simulation_result(&params, &outputs, None);
/// }
///
/// let target: OutputSet = [("out".to_string(), 6.0)].into_iter().collect();
/// let tolerance: OutputSet = [("out".to_string(), 1.0)].into_iter().collect();
/// manager.optimize_boundaries(&target, &tolerance, 0.8, AdjustmentMethod::BestPerformance);
///
/// let (min, max) = manager.space().get("x").unwrap().range();
/// assert!((max - min - 8.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationParameterManager {
    space: ParameterSpace,
    optimizer: ParameterOptimizer,
}

impl SimulationParameterManager {
    /// Create a manager over `space` with an empty history
    pub fn new(space: ParameterSpace) -> Self {
        Self {
            space,
            optimizer: ParameterOptimizer::new(),
        }
    }

    /// Create a manager that continues from an existing history
    pub fn with_optimizer(space: ParameterSpace, optimizer: ParameterOptimizer) -> Self {
        Self { space, optimizer }
    }

    /// Draw parameter sets from the current bounds, seeded from entropy
    pub fn get_next_parameters(
        &self,
        n_samples: usize,
        strategy: SamplingStrategy,
    ) -> Result<Vec<ParameterSet>> {
        ParameterSampler::new(&self.space).sample(n_samples, strategy, None)
    }

    /// Draw parameter sets from the current bounds with a fixed seed
    pub fn get_next_parameters_seeded(
        &self,
        n_samples: usize,
        strategy: SamplingStrategy,
        seed: u64,
    ) -> Result<Vec<ParameterSet>> {
        ParameterSampler::new(&self.space).sample(n_samples, strategy, Some(seed))
    }

    /// Append an evaluation to the history
    pub fn record_simulation_result(
        &mut self,
        parameters: &ParameterSet,
        outputs: &OutputSet,
        target_outputs: Option<&OutputSet>,
    ) {
        self.optimizer.add_result(parameters, outputs, target_outputs);
    }

    /// Narrow the space from the history
    pub fn optimize_boundaries(
        &mut self,
        target_outputs: &OutputSet,
        tolerance: &OutputSet,
        shrink_factor: f64,
        method: AdjustmentMethod,
    ) -> AdjustmentOutcome {
        self.optimizer.adjust_boundaries(
            &mut self.space,
            target_outputs,
            tolerance,
            shrink_factor,
            method,
        )
    }

    /// Narrow the space from the history using full adjustment settings
    pub fn optimize_with_config(&mut self, config: &AdjustmentConfig) -> AdjustmentOutcome {
        self.optimizer.adjust_with_config(&mut self.space, config)
    }

    /// Current value of every parameter
    pub fn get_current_parameters(&self) -> ParameterSet {
        self.space.get_current_values()
    }

    /// Assign current values; unknown names are logged and ignored
    pub fn set_current_parameters(&mut self, values: &ParameterSet) {
        self.space.set_current_values(values);
    }

    /// Column-aligned export of the history
    pub fn get_history(&self) -> HistoryTable {
        self.optimizer.history_table()
    }

    /// The managed space
    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    /// Mutable access to the managed space
    pub fn space_mut(&mut self) -> &mut ParameterSpace {
        &mut self.space
    }

    /// The evaluation history
    pub fn optimizer(&self) -> &ParameterOptimizer {
        &self.optimizer
    }

    /// Split into the space and the history
    pub fn into_parts(self) -> (ParameterSpace, ParameterOptimizer) {
        (self.space, self.optimizer)
    }
}
