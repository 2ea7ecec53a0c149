//! Warnings from ParameterSpace updates

use crate::test_helpers::{capture_warnings, values, xy_space};

#[test]
fn test_unknown_name_is_logged() {
    let mut space = xy_space();
    let before = space.clone();

    let ((), logs) = capture_warnings(|| space.set_current_values(&values(&[("z", 3.0)])));

    assert_eq!(space, before);
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("parameter not found in parameter space"), "{logs}");
    assert!(logs.contains("z"), "{logs}");
}

#[test]
fn test_known_names_log_nothing() {
    let mut space = xy_space();
    let ((), logs) = capture_warnings(|| space.set_current_values(&values(&[("x", 3.0)])));
    assert!(logs.is_empty(), "{logs}");
}

#[test]
fn test_invalid_boundary_update_is_logged() {
    let mut space = xy_space();
    let ((), logs) = capture_warnings(|| space.update_boundaries([("y", (3.0, -3.0))]));

    assert_eq!(space.get("y").unwrap().range(), (-5.0, 5.0));
    assert!(logs.contains("skipping invalid boundary update"), "{logs}");
}

#[test]
fn test_collapsing_shrink_is_logged() {
    let mut space = xy_space();
    let before = space.clone();
    let ((), logs) = capture_warnings(|| space.shrink_boundaries(0.0, None));

    assert_eq!(space, before);
    assert!(logs.contains("shrink factor collapses the range"), "{logs}");
}
