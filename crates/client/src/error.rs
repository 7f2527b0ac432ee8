use engine::EngineError;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base_url: {0}")]
    InvalidUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Transport(reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}
