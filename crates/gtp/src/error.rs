use std::path::PathBuf;

use autoplay_core::Version;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GtpError {
    #[error("engine failed to launch: {0}")]
    LaunchFailure(#[source] std::io::Error),

    #[error("engine process died unexpectedly")]
    ProcessDied,

    #[error("malformed protocol reply: {0:?}")]
    WrongProtocolReply(String),

    #[error("engine version {found} is older than required {required}")]
    VersionTooOld { found: Version, required: Version },

    #[error("unparseable engine version: {0:?}")]
    UnparseableVersion(String),

    #[error("resume file not found: {0}")]
    MissingResumeFile(PathBuf),

    #[error("setup command rejected by engine: {0:?}")]
    SetupCommandFailed(String),

    #[error("no winner could be determined")]
    NoWinnerFound,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GtpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GtpError::VersionTooOld {
            found: Version::new(0, 16, 0),
            required: Version::new(0, 17, 0),
        };
        assert!(error.to_string().contains("0.16.0"));
        assert!(error.to_string().contains("0.17.0"));

        let error = GtpError::SetupCommandFailed("fixed_handicap 9".to_string());
        assert!(error.to_string().contains("fixed_handicap"));
    }
}
