//! Parameter space implementation
//!
//! This module provides the [`ParameterSpace`] struct, an insertion-ordered
//! collection of [`ParameterBound`]s. The insertion order is the canonical axis
//! order for every vector operation in the crate (sample matrices, regression
//! feature rows, ordered value lists).

use crate::error::{ParamOptError, Result};
use crate::parameters::bound::{BoundError, ParameterBound};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Mapping from parameter name to a physical value, in canonical order.
pub type ParameterSet = IndexMap<String, f64>;

/// A collection of parameter bounds under simultaneous exploration
///
/// Parameters keep the order in which they were first added. Re-adding a name
/// replaces its bound in place without changing its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<ParameterBound>", from = "Vec<ParameterBound>")]
pub struct ParameterSpace {
    parameters: IndexMap<String, ParameterBound>,
}

impl From<Vec<ParameterBound>> for ParameterSpace {
    fn from(bounds: Vec<ParameterBound>) -> Self {
        let mut space = Self::new();
        for bound in bounds {
            space.add(bound);
        }
        space
    }
}

impl From<ParameterSpace> for Vec<ParameterBound> {
    fn from(space: ParameterSpace) -> Self {
        space.parameters.into_values().collect()
    }
}

impl ParameterSpace {
    /// Create a new empty parameter space
    ///
    /// # Examples
    ///
    /// ```
    /// use paramopt_rs::parameters::ParameterSpace;
    ///
    /// let space = ParameterSpace::new();
    /// assert_eq!(space.len(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            parameters: IndexMap::new(),
        }
    }

    /// Add a bound to the space, replacing any bound with the same name
    pub fn add(&mut self, bound: ParameterBound) {
        self.parameters.insert(bound.name().to_string(), bound);
    }

    /// Add a parameter with the given range
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
    /// `Ok(())` if the parameter was added, or an error if `min_value >= max_value`
    ///
    /// # Examples
    ///
    /// ```
    /// use paramopt_rs::parameters::ParameterSpace;
    ///
    /// let mut space = ParameterSpace::new();
    /// space.add_parameter("N1", 5.0, 20.0, Some(10.0), "turns").unwrap();
    /// space.add_parameter("w1", 50e-3, 200e-3, None, "m").unwrap();
    ///
    /// let names: Vec<&str> = space.names().collect();
    /// assert_eq!(names, vec!["N1", "w1"]);
    /// ```
    pub fn add_parameter(
        &mut self,
        name: &str,
        min_value: f64,
        max_value: f64,
        current_value: Option<f64>,
        unit: &str,
    ) -> std::result::Result<(), BoundError> {
        let bound = ParameterBound::new(name, min_value, max_value, current_value, unit)?;
        self.add(bound);
        Ok(())
    }

    /// Get a bound by name
    pub fn get(&self, name: &str) -> Option<&ParameterBound> {
        self.parameters.get(name)
    }

    /// Get a mutable reference to a bound by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParameterBound> {
        self.parameters.get_mut(name)
    }

    /// Get a bound by its canonical axis index
    pub fn get_index(&self, index: usize) -> Option<&ParameterBound> {
        self.parameters.get_index(index).map(|(_, bound)| bound)
    }

    /// Check if the space contains a parameter with the given name
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Number of parameters (dimensions) in the space
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the space has no parameters
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameter names in canonical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    /// Iterate over the bounds in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &ParameterBound> {
        self.parameters.values()
    }

    /// Snapshot of every parameter's current value, in canonical order
    pub fn get_current_values(&self) -> ParameterSet {
        self.parameters
            .iter()
            .map(|(name, bound)| (name.clone(), bound.current_value()))
            .collect()
    }

    /// Alias for [`get_current_values`](Self::get_current_values)
    pub fn to_dict(&self) -> ParameterSet {
        self.get_current_values()
    }

    /// Snapshot of every parameter's `(min, max)` range, in canonical order
    pub fn ranges(&self) -> IndexMap<String, (f64, f64)> {
        self.parameters
            .iter()
            .map(|(name, bound)| (name.clone(), bound.range()))
            .collect()
    }

    /// Set current values from a (possibly partial) mapping
    ///
    /// Known names are clamped into their range and assigned. Unknown names are
    /// logged and ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use paramopt_rs::parameters::ParameterSpace;
    ///
    /// let mut space = ParameterSpace::new();
    /// space.add_parameter("x", 0.0, 10.0, None, "").unwrap();
    ///
    /// space.set_current_values([("x", 12.0), ("unknown", 1.0)]);
    /// assert_eq!(space.get("x").unwrap().current_value(), 10.0);
    /// ```
    pub fn set_current_values<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Borrow<f64>,
    {
        for (name, value) in values {
            let name = name.as_ref();
            match self.parameters.get_mut(name) {
                Some(bound) => {
                    bound.set_current_value(*value.borrow());
                }
                None => {
                    tracing::warn!(
                        target: "paramopt",
                        parameter = name,
                        "parameter not found in parameter space"
                    );
                }
            }
        }
    }

    /// Assign current values from a list ordered like the space
    ///
    /// # Returns
    ///
    /// `Ok(())` if the list length equals the number of parameters, or a
    /// dimension-mismatch error otherwise (in which case nothing is assigned)
    pub fn set_from_slice(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.parameters.len() {
            return Err(ParamOptError::DimensionMismatch(format!(
                "Input list must have exactly {} elements, but got {}",
                self.parameters.len(),
                values.len()
            )));
        }

        for (bound, &value) in self.parameters.values_mut().zip(values) {
            bound.set_current_value(value);
        }

        Ok(())
    }

    /// Build a value mapping from a list ordered like the space
    ///
    /// The values are taken as given (no clamping). Fails with a
    /// dimension-mismatch error when the list length differs from the number of
    /// parameters.
    pub fn zip_values(&self, values: &[f64]) -> Result<ParameterSet> {
        if values.len() != self.parameters.len() {
            return Err(ParamOptError::DimensionMismatch(format!(
                "Input list must have exactly {} elements, but got {}",
                self.parameters.len(),
                values.len()
            )));
        }

        Ok(self
            .parameters
            .keys()
            .cloned()
            .zip(values.iter().copied())
            .collect())
    }

    /// Values of `set` in canonical order; names missing from `set` read as 0.0
    pub fn feature_row(&self, set: &ParameterSet) -> Vec<f64> {
        self.parameters
            .keys()
            .map(|name| set.get(name).copied().unwrap_or(0.0))
            .collect()
    }

    /// Replace the ranges of the named parameters
    ///
    /// Each updated parameter's current value is re-clamped into its new range.
    /// Unknown names and invalid ranges (`min >= max`) are logged and skipped.
    pub fn update_boundaries<I, K, V>(&mut self, new_bounds: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Borrow<(f64, f64)>,
    {
        for (name, range) in new_bounds {
            let name = name.as_ref();
            let (min, max) = *range.borrow();
            match self.parameters.get_mut(name) {
                Some(bound) => {
                    if let Err(err) = bound.set_range(min, max) {
                        tracing::warn!(
                            target: "paramopt",
                            parameter = name,
                            error = %err,
                            "skipping invalid boundary update"
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        target: "paramopt",
                        parameter = name,
                        "parameter not found in parameter space"
                    );
                }
            }
        }
    }

    /// Shrink every range by `factor` around a centre point
    ///
    /// For each parameter named in `center` (the current values when `None`),
    /// the new range has width `old_width * factor` and is centred on the
    /// centre value; the current value is re-clamped. Parameters absent from
    /// `center` are left untouched. `factor` is not validated: a factor above 1
    /// widens the range. A factor that would collapse a range (`<= 0`) leaves
    /// that parameter unchanged and logs a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use paramopt_rs::parameters::ParameterSpace;
    ///
    /// let mut space = ParameterSpace::new();
    /// space.add_parameter("x", 0.0, 10.0, Some(5.0), "").unwrap();
    ///
    /// space.shrink_boundaries(0.5, None);
    /// assert_eq!(space.get("x").unwrap().range(), (2.5, 7.5));
    /// ```
    pub fn shrink_boundaries(&mut self, factor: f64, center: Option<&ParameterSet>) {
        let center = match center {
            Some(center) => center.clone(),
            None => self.get_current_values(),
        };

        for (name, bound) in self.parameters.iter_mut() {
            let Some(&center_value) = center.get(name) else {
                continue;
            };

            let half_width = bound.width() * factor / 2.0;
            if let Err(err) = bound.set_range(center_value - half_width, center_value + half_width)
            {
                tracing::warn!(
                    target: "paramopt",
                    parameter = name.as_str(),
                    factor,
                    error = %err,
                    "shrink factor collapses the range, keeping current bounds"
                );
            }
        }
    }

    /// Save the space to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Serialize the space to a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use paramopt_rs::parameters::ParameterSpace;
    ///
    /// let mut space = ParameterSpace::new();
    /// space.add_parameter("x", 0.0, 10.0, None, "mm").unwrap();
    ///
    /// let json = space.to_json().unwrap();
    /// let restored = ParameterSpace::from_json(&json).unwrap();
    /// assert_eq!(restored, space);
    /// ```
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    /// Load a space from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load a space from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let space = serde_json::from_str(json)?;
        Ok(space)
    }
}
