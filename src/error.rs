use thiserror::Error;

/// Failure while building a stats report. Metrics and geolocation errors are
/// not classified further; the message is shown to the user as-is.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("{0}")]
    OperationFailed(String),
}

impl From<reqwest::Error> for StatsError {
    fn from(e: reqwest::Error) -> Self {
        StatsError::OperationFailed(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Client error: {0}")]
    Client(String),
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
