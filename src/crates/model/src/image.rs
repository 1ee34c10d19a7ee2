use chrono::{DateTime, Utc};
use domain::image::ImageEntry;
use domain::value::{AlbumCode, FileName};

/// 图片访问路径前缀，与 `GET /api/images/{albumCode}/{fileName}` 对应
pub const IMAGE_URL_PREFIX: &str = "/api/images";

pub fn image_url(album_code: &AlbumCode, file_name: &FileName) -> String {
    format!("{}/{}/{}", IMAGE_URL_PREFIX, album_code, file_name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub url: String,
    pub album_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Image {
    /// 使用文件修改时间作为创建/更新时间
    pub fn from_entry(entry: &ImageEntry) -> Self {
        Self::with_timestamp(entry, entry.mtime)
    }

    /// 使用指定时间作为创建/更新时间
    pub fn with_timestamp(entry: &ImageEntry, at: DateTime<Utc>) -> Self {
        Self {
            id: entry.id().into(),
            name: entry.file_name.to_string(),
            url: image_url(&entry.album_code, &entry.file_name),
            album_code: entry.album_code.to_string(),
            created_at: at,
            updated_at: at,
        }
    }
}
