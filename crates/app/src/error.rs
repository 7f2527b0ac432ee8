use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid timezone: {0}")]
    Timezone(String),
    #[error(transparent)]
    Client(#[from] expense_client::ClientError),
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("couldn't load expenses: {0}")]
    Load(String),
    #[error("nothing to change: pass --description, --amount or --date")]
    EmptyEdit,
}
