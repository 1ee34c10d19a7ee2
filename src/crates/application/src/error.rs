use domain::store::StoreError;
use domain::value::ValueError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),
    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl From<ValueError> for AppError {
    fn from(err: ValueError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
