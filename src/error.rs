use thiserror::Error;

#[derive(Error, Debug)]
pub enum CentboxError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid objective: {0}")]
    InvalidObjective(String),

    #[error("Box {index} is out of range (plan has {total} boxes)")]
    BoxOutOfRange { index: usize, total: usize },

    #[error("Could not generate a unique plan id after {0} attempts")]
    IdCollision(usize),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, CentboxError>;
