use thiserror::Error;

/// Problems loading the course wiring
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse course config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no lesson map for course {0:?}")]
    UnknownCourse(String),
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
