//! Tests for ParameterBound

use approx::assert_relative_eq;
use paramopt_rs::parameters::{BoundError, ParameterBound};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn test_rejects_empty_or_inverted_range() {
    let err = ParameterBound::new("core", 2.0, 2.0, None, "mm").unwrap_err();
    assert!(matches!(err, BoundError::InvalidRange { ref name, .. } if name == "core"));

    assert!(ParameterBound::new("core", 3.0, 2.0, None, "mm").is_err());
    assert!(ParameterBound::new("core", f64::NAN, 2.0, None, "mm").is_err());
}

#[test]
fn test_normalize_endpoints_for_random_ranges() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..200 {
        let min: f64 = rng.gen_range(-1e3..1e3);
        let max = min + rng.gen_range(1e-3..1e3);
        let bound = ParameterBound::new("p", min, max, None, "").unwrap();

        assert_eq!(bound.normalize(min), 0.0);
        assert_eq!(bound.normalize(max), 1.0);

        let v = rng.gen_range(min..=max);
        assert_relative_eq!(
            bound.denormalize(bound.normalize(v)),
            v,
            epsilon = 1e-9 * (1.0 + v.abs())
        );
    }
}

#[test]
fn test_clip_is_idempotent() {
    let bound = ParameterBound::new("p", -1.0, 4.0, None, "").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..200 {
        let x: f64 = rng.gen_range(-100.0..100.0);
        let once = bound.clip(x);
        assert_eq!(bound.clip(once), once);
        assert!(bound.contains(once));
    }
}

#[test]
fn test_current_value_defaults_and_clamps() {
    let bound = ParameterBound::new("p", 2.0, 6.0, None, "").unwrap();
    assert_eq!(bound.current_value(), 4.0);

    let bound = ParameterBound::new("p", 2.0, 6.0, Some(10.0), "").unwrap();
    assert_eq!(bound.current_value(), 6.0);

    let mut bound = ParameterBound::new("p", 2.0, 6.0, Some(3.0), "").unwrap();
    assert_eq!(bound.set_current_value(-1.0), 2.0);
}

#[test]
fn test_set_range_reclamps_and_rejects_invalid() {
    let mut bound = ParameterBound::new("p", 0.0, 10.0, Some(9.0), "A").unwrap();

    bound.set_range(0.0, 5.0).unwrap();
    assert_eq!(bound.range(), (0.0, 5.0));
    assert_eq!(bound.current_value(), 5.0);

    assert!(bound.set_range(4.0, 1.0).is_err());
    assert_eq!(bound.range(), (0.0, 5.0));
    assert_eq!(bound.unit(), "A");
}
