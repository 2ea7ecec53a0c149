//! Parameter bound implementation
//!
//! This module provides [`ParameterBound`], a single named scalar with an
//! admissible range, a current value, and a unit tag. It supplies the clamping
//! and `[0, 1]` normalization used by the sampler and the boundary optimizer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundError {
    #[error("Parameter '{name}': min_value ({min}) must be less than max_value ({max})")]
    InvalidRange { name: String, min: f64, max: f64 },
}

/// The admissible range, current value and unit of one named parameter.
///
/// The range always satisfies `min_value < max_value`, and the current value
/// always lies inside `[min_value, max_value]`. Both are checked on
/// construction and whenever the range is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBound")]
pub struct ParameterBound {
    /// Name of the parameter
    name: String,

    /// Lower end of the admissible range
    min_value: f64,

    /// Upper end of the admissible range
    max_value: f64,

    /// Current value, clamped into the range
    current_value: f64,

    /// Unit tag (carried, never interpreted)
    unit: String,
}

/// Unvalidated mirror of [`ParameterBound`] used during deserialization.
#[derive(Deserialize)]
struct RawBound {
    name: String,
    min_value: f64,
    max_value: f64,
    #[serde(default)]
    current_value: Option<f64>,
    #[serde(default)]
    unit: String,
}

impl TryFrom<RawBound> for ParameterBound {
    type Error = BoundError;

    fn try_from(raw: RawBound) -> Result<Self, Self::Error> {
        ParameterBound::new(
            &raw.name,
            raw.min_value,
            raw.max_value,
            raw.current_value,
            &raw.unit,
        )
    }
}

fn check_range(name: &str, min: f64, max: f64) -> Result<(), BoundError> {
    // `!(min < max)` also rejects NaN endpoints
    if !(min < max) {
        return Err(BoundError::InvalidRange {
            name: name.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

impl ParameterBound {
    /// Create a new parameter bound
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter
    /// * `min_value` - Lower end of the range
    /// * `max_value` - Upper end of the range
    /// * `current_value` - Starting value, or `None` for the midpoint
    /// * `unit` - Unit tag
    ///
    /// # Returns
    ///
    /// A new `ParameterBound`, or an error if `min_value >= max_value`
    ///
    /// # Examples
    ///
    /// ```
    /// use paramopt_rs::parameters::ParameterBound;
    ///
    /// let bound = ParameterBound::new("w1", 50e-3, 200e-3, None, "m").unwrap();
    /// assert!((bound.current_value() - 125e-3).abs() < 1e-12);
    ///
    /// assert!(ParameterBound::new("w1", 1.0, 1.0, None, "m").is_err());
    /// ```
    pub fn new(
        name: &str,
        min_value: f64,
        max_value: f64,
        current_value: Option<f64>,
        unit: &str,
    ) -> Result<Self, BoundError> {
        check_range(name, min_value, max_value)?;

        let current = current_value.unwrap_or((min_value + max_value) / 2.0);

        Ok(Self {
            name: name.to_string(),
            min_value,
            max_value,
            current_value: current.clamp(min_value, max_value),
            unit: unit.to_string(),
        })
    }

    /// Get the name of the parameter
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the lower end of the range
    pub fn min(&self) -> f64 {
        self.min_value
    }

    /// Get the upper end of the range
    pub fn max(&self) -> f64 {
        self.max_value
    }

    /// Get the range as a `(min, max)` pair
    pub fn range(&self) -> (f64, f64) {
        (self.min_value, self.max_value)
    }

    /// Width of the range (`max - min`), always positive
    pub fn width(&self) -> f64 {
        self.max_value - self.min_value
    }

    /// Get the current value of the parameter
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Get the unit tag
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Check whether a value lies inside the range (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value && value <= self.max_value
    }

    /// Clamp a value into `[min, max]`
    ///
    /// # Examples
    ///
    /// ```
    /// use paramopt_rs::parameters::ParameterBound;
    ///
    /// let bound = ParameterBound::new("x", 0.0, 10.0, None, "").unwrap();
    /// assert_eq!(bound.clip(-5.0), 0.0);
    /// assert_eq!(bound.clip(5.0), 5.0);
    /// assert_eq!(bound.clip(15.0), 10.0);
    /// ```
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.min_value, self.max_value)
    }

    /// Map a value onto `[0, 1]` relative to the range
    ///
    /// Values outside the range map outside `[0, 1]`; no clamping is applied.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min_value) / (self.max_value - self.min_value)
    }

    /// Map a unit-interval fraction back onto the range
    ///
    /// `u` is expected to come from `[0, 1]`; it is not clamped.
    pub fn denormalize(&self, u: f64) -> f64 {
        self.min_value + u * (self.max_value - self.min_value)
    }

    /// Set the current value, clamping it into the range
    ///
    /// # Returns
    ///
    /// The value actually stored
    pub fn set_current_value(&mut self, value: f64) -> f64 {
        self.current_value = self.clip(value);
        self.current_value
    }

    /// Replace the range and re-clamp the current value
    ///
    /// # Returns
    ///
    /// `Ok(())` if the range was replaced, or an error if `min >= max`. On error
    /// the bound is left untouched.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<(), BoundError> {
        check_range(&self.name, min, max)?;

        self.min_value = min;
        self.max_value = max;
        self.current_value = self.clip(self.current_value);

        Ok(())
    }

    /// Replace the unit tag
    pub fn set_unit(&mut self, unit: &str) {
        self.unit = unit.to_string();
    }
}
