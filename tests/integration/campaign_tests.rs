//! Full campaigns

use crate::test_helpers::values;
use paramopt_rs::campaign::{Campaign, CampaignConfig, SimulationExecutor};
use paramopt_rs::optimizer::{AdjustmentConfig, AdjustmentMethod, OutputSet};
use paramopt_rs::parameters::{ParameterSet, ParameterSpace};
use paramopt_rs::sampling::SamplingStrategy;
use paramopt_rs::surrogate::GpConfig;
use paramopt_rs::{ParamOptError, Result};

/// Inductor stand-in with a physical failure region
struct InductorModel {
    max_turns: f64,
}

impl SimulationExecutor for InductorModel {
    fn evaluate(&self, params: &ParameterSet) -> Result<OutputSet> {
        let turns = params["turns"];
        if turns > self.max_turns {
            return Err(ParamOptError::SimulationFailure(format!(
                "winding does not fit: {turns} turns"
            )));
        }
        let inductance = 0.02 * turns * turns / params["gap"];
        Ok(values(&[("inductance", inductance)]))
    }
}

fn space() -> ParameterSpace {
    let mut space = ParameterSpace::new();
    space.add_parameter("turns", 5.0, 40.0, None, "").unwrap();
    space.add_parameter("gap", 0.5, 4.0, None, "mm").unwrap();
    space
}

fn adjustment(method: AdjustmentMethod) -> AdjustmentConfig {
    AdjustmentConfig::default()
        .with_target("inductance", 6.0)
        .with_tolerance("inductance", 0.3)
        .with_method(method)
}

#[test]
fn test_campaign_reaches_target_with_each_method() {
    for method in [
        AdjustmentMethod::BestPerformance,
        AdjustmentMethod::Constraint,
        AdjustmentMethod::Regression,
    ] {
        let adjustment = adjustment(method)
            .with_tolerance("inductance", 0.6)
            .with_gp(GpConfig::default().with_restarts(2))
            .with_seed(8);
        let config = CampaignConfig::new(adjustment)
            .with_iterations(10)
            .with_samples_per_iteration(12)
            .with_seed(17);

        let executor = InductorModel { max_turns: 100.0 };
        let mut campaign = Campaign::new(space(), executor, config).unwrap();
        let report = campaign.run().unwrap();

        let achieved = report
            .achieved
            .unwrap_or_else(|| panic!("{method} did not reach the target"));
        let inductance = 0.02 * achieved["turns"].powi(2) / achieved["gap"];
        assert!((inductance - 6.0).abs() <= 0.6, "{method}: {inductance}");
        assert_eq!(report.history.len(), report.iterations_run * 12);
    }
}

#[test]
fn test_campaign_records_targets_and_skips_failures() {
    let config = CampaignConfig::new(adjustment(AdjustmentMethod::BestPerformance))
        .with_iterations(1)
        .with_samples_per_iteration(10)
        .with_strategy(SamplingStrategy::Uniform);

    // uniform sweep: turns = 5, 8.89, ..., 40; the last three exceed 30
    let executor = InductorModel { max_turns: 30.0 };
    let mut campaign = Campaign::new(space(), executor, config).unwrap();
    let report = campaign.run().unwrap();

    assert_eq!(report.failed_evaluations, 3);
    assert_eq!(report.history.len(), 7);
    assert_eq!(report.history.column("target_inductance"), Some(vec![Some(6.0); 7]));
}

#[test]
fn test_campaign_seed_reproducibility() {
    let config = CampaignConfig::new(adjustment(AdjustmentMethod::Constraint))
        .with_iterations(3)
        .with_samples_per_iteration(6)
        .with_strategy(SamplingStrategy::Random)
        .with_seed(123);

    let run = |config: CampaignConfig| {
        Campaign::new(space(), InductorModel { max_turns: 100.0 }, config)
            .unwrap()
            .run()
            .unwrap()
    };

    assert_eq!(run(config.clone()), run(config.with_parallel_evaluation(true)));
}

#[test]
fn test_manager_state_after_campaign() {
    let config = CampaignConfig::new(adjustment(AdjustmentMethod::BestPerformance))
        .with_iterations(2)
        .with_samples_per_iteration(5)
        .with_seed(2);

    let mut campaign = Campaign::new(space(), InductorModel { max_turns: 100.0 }, config).unwrap();
    let report = campaign.run().unwrap();
    let manager = campaign.into_manager();

    assert_eq!(manager.optimizer().len(), report.history.len());
    assert_eq!(manager.space(), &report.final_space);

    // the current values were last set from the final recorded sample
    let last = manager.optimizer().history().last().unwrap().parameters.clone();
    let current = manager.get_current_parameters();
    for (name, value) in &last {
        let bound = manager.space().get(name).unwrap();
        assert_eq!(current[name], bound.clip(*value));
    }
}

#[test]
fn test_config_file_round_trip() {
    let config = CampaignConfig::new(adjustment(AdjustmentMethod::Regression))
        .with_iterations(4)
        .with_strategy(SamplingStrategy::Sobol)
        .with_seed(99);

    let path = std::env::temp_dir().join(format!("paramopt_campaign_{}.json", std::process::id()));
    config.save_json(&path).unwrap();
    let loaded = CampaignConfig::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_config_in_file_is_rejected() {
    let config = CampaignConfig::from_json(r#"{"samples_per_iteration": 0}"#).unwrap();
    let result = Campaign::new(space(), InductorModel { max_turns: 1.0 }, config);
    assert!(matches!(result, Err(ParamOptError::InvalidConfig(_))));

    assert!(CampaignConfig::from_json(r#"{"strategy": "halton"}"#).is_err());
}
