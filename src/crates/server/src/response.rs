use application::command::upload_image::BatchUploadReport;
use chrono::{DateTime, SecondsFormat, Utc};
use model::album::Album;
use model::image::Image;
use serde::Serialize;

use crate::error::ApiError;

/// ISO-8601 时间，精确到毫秒，UTC 以 `Z` 结尾
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub code: String,
    pub name: String,
    pub image_count: usize,
    pub last_modified: String,
}

impl From<Album> for AlbumResponse {
    fn from(album: Album) -> Self {
        Self {
            last_modified: format_timestamp(&album.last_modified),
            code: album.code,
            name: album.name,
            image_count: album.image_count,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: String,
    pub name: String,
    pub url: String,
    pub album_code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            created_at: format_timestamp(&image.created_at),
            updated_at: format_timestamp(&image.updated_at),
            id: image.id,
            name: image.name,
            url: image.url,
            album_code: image.album_code,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct BatchItemResponse {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ImageResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct BatchUploadResponse {
    pub uploaded: usize,
    pub failed: usize,
    pub results: Vec<BatchItemResponse>,
}

impl BatchUploadResponse {
    /// 单个文件的错误消息沿用单文件上传的对外消息
    pub fn from_report(report: BatchUploadReport, internal: &str) -> Self {
        let uploaded = report.uploaded();
        let failed = report.failed();
        let results = report
            .results
            .into_iter()
            .map(|item| match item.outcome {
                Ok(image) => BatchItemResponse {
                    name: item.name,
                    success: true,
                    data: Some(image.into()),
                    message: None,
                },
                Err(e) => BatchItemResponse {
                    name: item.name,
                    success: false,
                    data: None,
                    message: Some(ApiError::from_command(e, internal).to_string()),
                },
            })
            .collect();
        Self {
            uploaded,
            failed,
            results,
        }
    }
}
