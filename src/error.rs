use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid difficulty selection: {0:?}")]
    InvalidDifficulty(String),
    #[error("screen capture failed: {0}")]
    Capture(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
