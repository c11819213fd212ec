use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Extract(#[from] livecut_engine::ExtractError),
}

pub type Result<T> = std::result::Result<T, AppError>;
