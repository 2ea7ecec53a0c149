use thiserror::Error;

/// Error types for the paramopt-rs library.
#[derive(Error, Debug)]
pub enum ParamOptError {
    /// Error indicating a mismatch between a value list and the parameter schema.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error for an invalid parameter range.
    #[error("Bounds error: {0}")]
    BoundsError(#[from] crate::parameters::bound::BoundError),

    /// Sampling strategy name that is not recognised.
    #[error("Unknown sampling strategy: {0}")]
    UnknownStrategy(String),

    /// Boundary adjustment method name that is not recognised.
    #[error("Unknown adjustment method: {0}")]
    UnknownMethod(String),

    /// Error while generating samples.
    #[error("Sampling error: {0}")]
    SamplingError(String),

    /// Error while fitting or evaluating the surrogate model.
    #[error("Surrogate model error: {0}")]
    SurrogateError(String),

    /// Error reported by the simulation executor.
    #[error("Simulation failed: {0}")]
    SimulationFailure(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for paramopt-rs operations.
pub type Result<T> = std::result::Result<T, ParamOptError>;
