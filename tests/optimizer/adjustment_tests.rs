//! Tests for the adjustment methods

use crate::test_helpers::{approx_eq, values, xy_space};
use paramopt_rs::optimizer::{
    AdjustmentConfig, AdjustmentMethod, AdjustmentOutcome, OutputSet, ParameterOptimizer,
    SkipReason,
};
use paramopt_rs::parameters::ParameterSpace;
use paramopt_rs::ParamOptError;

fn one_dimensional() -> ParameterSpace {
    let mut space = ParameterSpace::new();
    space.add_parameter("x", 0.0, 10.0, Some(5.0), "").unwrap();
    space
}

fn three_records() -> ParameterOptimizer {
    let mut optimizer = ParameterOptimizer::new();
    optimizer.add_result(&values(&[("x", 2.0)]), &values(&[("out", 1.0)]), None);
    optimizer.add_result(&values(&[("x", 5.0)]), &values(&[("out", 5.0)]), None);
    optimizer.add_result(&values(&[("x", 8.0)]), &values(&[("out", 9.0)]), None);
    optimizer
}

#[test]
fn test_best_performance_end_to_end() {
    let mut space = one_dimensional();
    let optimizer = three_records();
    let target = values(&[("out", 4.0)]);
    let tolerance = values(&[("out", 1.0)]);

    assert_eq!(optimizer.find_best_result(&target, &tolerance), Some(1));

    let outcome = optimizer.adjust_boundaries(
        &mut space,
        &target,
        &tolerance,
        0.5,
        AdjustmentMethod::BestPerformance,
    );

    assert_eq!(
        outcome,
        AdjustmentOutcome::Shrunk {
            center: values(&[("x", 5.0)])
        }
    );
    assert_eq!(space.get("x").unwrap().range(), (2.5, 7.5));
    assert_eq!(space.get("x").unwrap().current_value(), 5.0);
}

#[test]
fn test_best_performance_weights_by_tolerance() {
    let mut optimizer = ParameterOptimizer::new();
    // a is 2 off with tolerance 10, b is 0.5 off with tolerance 0.1
    optimizer.add_result(
        &values(&[("x", 1.0)]),
        &values(&[("a", 2.0), ("b", 0.0)]),
        None,
    );
    optimizer.add_result(
        &values(&[("x", 9.0)]),
        &values(&[("a", 10.0), ("b", 0.5)]),
        None,
    );

    let target = values(&[("a", 0.0), ("b", 0.0)]);
    let tolerance = values(&[("a", 10.0), ("b", 0.1)]);
    assert_eq!(optimizer.find_best_result(&target, &tolerance), Some(0));
}

#[test]
fn test_ties_keep_first_record() {
    let mut optimizer = ParameterOptimizer::new();
    for x in [3.0, 7.0, 1.0] {
        optimizer.add_result(&values(&[("x", x)]), &values(&[("out", 4.0)]), None);
    }

    let best = optimizer.find_best_result(&values(&[("out", 4.0)]), &OutputSet::new());
    assert_eq!(best, Some(0));
}

#[test]
fn test_best_performance_with_unrelated_outputs_picks_first() {
    let mut space = one_dimensional();
    let optimizer = three_records();

    // no target output is observed, so every score is 0
    let outcome = optimizer.adjust_boundaries(
        &mut space,
        &values(&[("missing", 1.0)]),
        &OutputSet::new(),
        0.5,
        AdjustmentMethod::BestPerformance,
    );

    assert_eq!(
        outcome,
        AdjustmentOutcome::Shrunk {
            center: values(&[("x", 2.0)])
        }
    );
    assert_eq!(space.get("x").unwrap().range(), (-0.5, 4.5));
}

#[test]
fn test_constraint_without_satisfying_records_is_byte_identical() {
    let mut space = xy_space();
    space.set_current_values(&values(&[("x", 1.25), ("y", -0.3)]));
    let before = space.to_json().unwrap();

    let mut optimizer = ParameterOptimizer::new();
    optimizer.add_result(
        &values(&[("x", 1.0), ("y", 0.0)]),
        &values(&[("out", 50.0)]),
        None,
    );

    let outcome = optimizer.adjust_boundaries(
        &mut space,
        &values(&[("out", 0.0)]),
        &values(&[("out", 1.0)]),
        0.8,
        AdjustmentMethod::Constraint,
    );

    assert_eq!(outcome, AdjustmentOutcome::Skipped(SkipReason::NoSatisfyingRecord));
    assert_eq!(space.to_json().unwrap(), before);
}

#[test]
fn test_constraint_brackets_satisfying_region() {
    let mut space = xy_space();
    let mut optimizer = ParameterOptimizer::new();
    for (x, y) in [(1.0, -4.0), (4.0, 1.0), (6.0, 3.0), (9.0, 4.0)] {
        let out = x + y;
        optimizer.add_result(&values(&[("x", x), ("y", y)]), &values(&[("out", out)]), None);
    }

    // passing: (4, 1) -> 5 and (6, 3) -> 9
    let config = AdjustmentConfig::default()
        .with_target("out", 7.0)
        .with_tolerance("out", 2.0)
        .with_method(AdjustmentMethod::Constraint);
    optimizer.adjust_with_config(&mut space, &config);

    let (x_min, x_max) = space.get("x").unwrap().range();
    assert!(approx_eq(x_min, 3.8, 1e-12));
    assert!(approx_eq(x_max, 6.2, 1e-12));
    let (y_min, y_max) = space.get("y").unwrap().range();
    assert!(approx_eq(y_min, 0.8, 1e-12));
    assert!(approx_eq(y_max, 3.2, 1e-12));
}

#[test]
fn test_constraint_ignores_outputs_without_tolerance() {
    let mut space = one_dimensional();
    let mut optimizer = ParameterOptimizer::new();
    optimizer.add_result(&values(&[("x", 2.0)]), &values(&[("out", 100.0)]), None);
    optimizer.add_result(&values(&[("x", 6.0)]), &values(&[("out", -100.0)]), None);

    optimizer.adjust_boundaries(
        &mut space,
        &values(&[("out", 0.0)]),
        &OutputSet::new(),
        0.8,
        AdjustmentMethod::Constraint,
    );

    let (min, max) = space.get("x").unwrap().range();
    assert!(approx_eq(min, 1.6, 1e-12));
    assert!(approx_eq(max, 6.4, 1e-12));
}

#[test]
fn test_regression_short_history_matches_best_performance() {
    let target = values(&[("out", 4.0)]);
    let tolerance = values(&[("out", 1.0)]);
    let optimizer = three_records();

    let mut via_regression = one_dimensional();
    optimizer.adjust_boundaries(
        &mut via_regression,
        &target,
        &tolerance,
        0.5,
        AdjustmentMethod::Regression,
    );

    let mut via_best = one_dimensional();
    optimizer.adjust_boundaries(
        &mut via_best,
        &target,
        &tolerance,
        0.5,
        AdjustmentMethod::BestPerformance,
    );

    assert_eq!(via_regression, via_best);
}

#[cfg(feature = "regression")]
#[test]
fn test_regression_two_outputs_averages_optima() {
    use paramopt_rs::surrogate::GpConfig;

    let mut space = xy_space();
    let mut optimizer = ParameterOptimizer::new();
    for i in 0..8 {
        let x = i as f64 * 10.0 / 7.0;
        let y = -5.0 + i as f64 * 10.0 / 7.0;
        optimizer.add_result(
            &values(&[("x", x), ("y", y)]),
            &values(&[("sum", x + y), ("diff", x - y)]),
            None,
        );
    }

    let config = AdjustmentConfig::default()
        .with_target("sum", 5.0)
        .with_target("diff", 5.0)
        .with_shrink_factor(0.5)
        .with_method(AdjustmentMethod::Regression)
        .with_gp(GpConfig::default().with_restarts(2))
        .with_seed(21);

    let outcome = optimizer.adjust_with_config(&mut space, &config);
    let AdjustmentOutcome::Shrunk { center } = outcome else {
        panic!("expected a shrink, got {outcome:?}");
    };

    let keys: Vec<&str> = center.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["x", "y"]);
    assert!(approx_eq(space.get("x").unwrap().width(), 5.0, 1e-9));
    assert!(approx_eq(space.get("y").unwrap().width(), 5.0, 1e-9));
}

#[test]
fn test_unknown_method_name_fails() {
    let err = "simulated_annealing".parse::<AdjustmentMethod>().unwrap_err();
    assert!(matches!(err, ParamOptError::UnknownMethod(_)));
}

#[test]
fn test_empty_history_leaves_space_unchanged() {
    let mut space = xy_space();
    let before = space.clone();

    let outcome = ParameterOptimizer::new().adjust_with_config(
        &mut space,
        &AdjustmentConfig::default().with_target("out", 1.0),
    );

    assert_eq!(outcome, AdjustmentOutcome::Skipped(SkipReason::EmptyHistory));
    assert_eq!(space, before);
}
