use crate::YouTubeError;
use thiserror::Error;

/// A mandatory data source (search or details) failed. The message is the
/// provider's own diagnostic, forwarded unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        ProviderError { message: message.into() }
    }
}

impl From<YouTubeError> for ProviderError {
    fn from(err: YouTubeError) -> Self {
        ProviderError::new(err.to_string())
    }
}

/// Why no revenue could be joined. Never fatal to a fetch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevenueUnavailable {
    #[error("no revenue provider configured")]
    NotConfigured,
    #[error("revenue provider returned no data")]
    NoData,
    #[error("revenue provider failed: {0}")]
    ProviderFailed(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("no channel available: pass a channel id or sign in with an access token")]
    MissingChannelScope,
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("failed to load configuration: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
