use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing work order parameter: {0}")]
    MissingParameter(String),

    #[error("invalid work order parameter {key}: {value:?}")]
    InvalidParameter { key: String, value: String },

    #[error("unparseable engine version: {0:?}")]
    UnparseableVersion(String),
}

impl CoreError {
    /// Create an invalid parameter error.
    pub fn invalid(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
