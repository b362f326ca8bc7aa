use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Distribution sampling failed after {attempts} attempts (min={min}, max={max}, skew={skew})")]
    SamplingFailed {
        attempts: u32,
        min: f64,
        max: f64,
        skew: f64,
    },

    #[error("Could not place a {category} loan in the reporting period after {attempts} attempts")]
    PlacementFailed {
        category: &'static str,
        attempts: u32,
    },

    #[error("Validity mode '{mode}' is not supported yet")]
    UnsupportedMode { mode: &'static str },

    #[error("Date out of range: {reason}")]
    DateOutOfRange { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GenError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type GenResult<T> = Result<T, GenError>;
