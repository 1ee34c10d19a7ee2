use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use application::error::AppError;
use application::query::QueryError;
use log::error;
use thiserror::Error;

pub const ERROR_FETCHING_ALBUMS: &str = "Error fetching albums";
pub const ERROR_ALBUM_UNREADABLE: &str = "Album not found or unreadable";
pub const ERROR_FETCHING_IMAGES: &str = "Error fetching images";
pub const ERROR_IMAGE_NOT_FOUND: &str = "Image not found";
pub const ERROR_SERVING_IMAGE: &str = "Error serving image";
pub const ERROR_UPLOADING_FILE: &str = "Error uploading file";
pub const ERROR_DELETING_IMAGE: &str = "Error deleting image";
pub const ERROR_VALIDATING_ALBUM: &str = "Error validating album";

/// HTTP 层错误，响应体为纯文本消息
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// 记录错误详情，对外只返回通用消息
    pub fn internal(message: &str, detail: impl std::fmt::Display) -> Self {
        error!("{}: {}", message, detail);
        ApiError::Internal(message.to_string())
    }

    /// 查询错误映射；`internal` 为服务端错误时返回的消息
    pub fn from_query(err: QueryError, internal: &str) -> Self {
        match err {
            QueryError::InvalidInput(m) | QueryError::InvalidParameter(m) => {
                ApiError::BadRequest(m)
            }
            QueryError::NotFound(_) => ApiError::NotFound(ERROR_IMAGE_NOT_FOUND.to_string()),
            QueryError::ExecutionError(m) => ApiError::internal(internal, m),
        }
    }

    /// 命令错误映射
    pub fn from_command(err: AppError, internal: &str) -> Self {
        match err {
            AppError::InvalidInput(m) => ApiError::BadRequest(m),
            AppError::NotFound(_) => ApiError::NotFound(ERROR_IMAGE_NOT_FOUND.to_string()),
            e => ApiError::internal(internal, e),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
