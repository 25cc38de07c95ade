use autoplay_core::CoreError;
use gtp::GtpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("engine error: {0}")]
    Engine(#[from] GtpError),

    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("engine binary not found")]
    EngineNotFound,

    #[error("job executed before init")]
    Uninitialized,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err: JobError = CoreError::MissingParameter("network".to_string()).into();
        assert!(err.to_string().contains("network"));

        let err: JobError = GtpError::NoWinnerFound.into();
        assert!(err.to_string().contains("winner"));
    }
}
