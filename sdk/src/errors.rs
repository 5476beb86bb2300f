use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No usable API credential is configured for the provider.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The supplied image payload is not a well-formed base64 data URL.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request to the provider failed or the parsing of the response
    /// failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returned a non-success status code.
    #[error("Status error: {1} (Status {0})")]
    Status(reqwest::StatusCode, String),
    /// The response from the provider was missing a required field.
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
}

impl AnalysisError {
    /// Whether the failure originated from the remote service rather than
    /// local configuration or input.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status(..) | Self::Invariant(..)
        )
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
