use thiserror::Error;

/// Errors produced while configuring the engine or building its tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A gas name has no entry in the cross-section registry.
    #[error("unknown gas: {0}")]
    UnknownGas(String),

    /// A setter was called with an out-of-range value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The mixture would need more scattering terms than the table can hold.
    #[error("maximum number of levels ({max}) exceeded")]
    LevelOverflow { max: usize },

    /// The cross-section provider failed for one of the mixture gases.
    #[error("cross-section data unavailable: {0}")]
    CrossSectionData(String),

    /// Photoabsorption data is missing for a required gas.
    #[error("optical data unavailable for {0}")]
    OpticalData(String),

    /// An internal table ended up in an inconsistent state.
    #[error("data consistency check failed: {0}")]
    DataConsistency(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
