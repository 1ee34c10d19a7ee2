use thiserror::Error;

pub mod config;
pub mod get_album_images;
pub mod get_all_images;
pub mod get_image_file;
pub mod list_albums;
pub mod validate_album;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Execution error: {0}")]
    ExecutionError(String),
}

impl From<domain::value::ValueError> for QueryError {
    fn from(err: domain::value::ValueError) -> Self {
        QueryError::InvalidInput(err.to_string())
    }
}
