use crate::value::{AlbumCode, FileName, ImageId};
use chrono::{DateTime, Utc};

/// 相册目录中的一个图片文件
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub album_code: AlbumCode,
    pub file_name: FileName,
    pub size: u64,
    /// 文件修改时间
    pub mtime: DateTime<Utc>,
}

impl ImageEntry {
    pub fn new(album_code: AlbumCode, file_name: FileName, size: u64, mtime: DateTime<Utc>) -> Self {
        Self {
            album_code,
            file_name,
            size,
            mtime,
        }
    }

    pub fn id(&self) -> ImageId {
        self.file_name.image_id()
    }
}
