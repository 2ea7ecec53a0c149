//! Manual optimization loops through SimulationParameterManager

use crate::test_helpers::{values, within_bounds};
use paramopt_rs::manager::SimulationParameterManager;
use paramopt_rs::optimizer::{AdjustmentMethod, OutputSet};
use paramopt_rs::parameters::{ParameterSet, ParameterSpace};
use paramopt_rs::sampling::SamplingStrategy;

/// Quadratic bowl with its minimum at turns = 20, gap = 1.5
fn simulate(params: &ParameterSet) -> OutputSet {
    let loss = (params["turns"] - 20.0).powi(2) + 10.0 * (params["gap"] - 1.5).powi(2);
    values(&[("loss", loss)])
}

fn design_space() -> ParameterSpace {
    let mut space = ParameterSpace::new();
    space.add_parameter("turns", 5.0, 50.0, None, "").unwrap();
    space.add_parameter("gap", 0.5, 5.0, None, "mm").unwrap();
    space
}

#[test]
fn test_repeated_best_performance_closes_in_on_optimum() {
    let mut manager = SimulationParameterManager::new(design_space());
    let target = values(&[("loss", 0.0)]);
    let tolerance = values(&[("loss", 1.0)]);

    for round in 0..6 {
        let samples = manager
            .get_next_parameters_seeded(16, SamplingStrategy::Lhs, round)
            .unwrap();
        for params in &samples {
            assert!(within_bounds(manager.space(), params));
            manager.record_simulation_result(params, &simulate(params), Some(&target));
        }
        manager.optimize_boundaries(&target, &tolerance, 0.7, AdjustmentMethod::BestPerformance);
    }

    let turns = manager.space().get("turns").unwrap();
    assert!(turns.width() < 45.0 * 0.7_f64.powi(5));
    let best = manager
        .optimizer()
        .find_best_result(&target, &tolerance)
        .unwrap();
    let best_loss = manager.optimizer().history()[best].outputs["loss"];
    assert!(best_loss < 25.0, "best loss {best_loss}");
    assert_eq!(manager.get_history().len(), 96);
}

#[test]
fn test_constraint_after_exploration() {
    let mut manager = SimulationParameterManager::new(design_space());
    for params in manager
        .get_next_parameters_seeded(30, SamplingStrategy::Sobol, 4)
        .unwrap()
    {
        manager.record_simulation_result(&params, &simulate(&params), None);
    }

    let target = values(&[("loss", 0.0)]);
    let tolerance = values(&[("loss", 200.0)]);
    let passing: Vec<ParameterSet> = manager
        .optimizer()
        .history()
        .iter()
        .filter(|r| r.outputs["loss"] <= 200.0)
        .map(|r| r.parameters.clone())
        .collect();
    let outcome =
        manager.optimize_boundaries(&target, &tolerance, 0.8, AdjustmentMethod::Constraint);

    assert!(passing.len() >= 2);
    assert!(outcome.is_applied());

    let turns = manager.space().get("turns").unwrap();
    for params in &passing {
        assert!(turns.min() <= params["turns"] && params["turns"] <= turns.max());
    }
}

#[test]
fn test_current_parameters_follow_assignment_and_bounds() {
    let mut manager = SimulationParameterManager::new(design_space());
    assert_eq!(manager.get_current_parameters()["turns"], 27.5);

    manager.set_current_parameters(&values(&[("turns", 48.0)]));
    manager
        .space_mut()
        .update_boundaries([("turns", (10.0, 30.0))]);

    assert_eq!(manager.get_current_parameters()["turns"], 30.0);
    assert_eq!(manager.get_current_parameters()["gap"], 2.75);
}
