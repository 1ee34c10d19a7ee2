use crate::value::AlbumCode;
use chrono::{DateTime, Utc};

/// 相册目录条目：相册即图片根目录下的一个子目录
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumEntry {
    pub code: AlbumCode,
    /// 目录中匹配图片扩展名的文件数量
    pub image_count: usize,
    /// 目录修改时间
    pub mtime: DateTime<Utc>,
}

impl AlbumEntry {
    pub fn new(code: AlbumCode, image_count: usize, mtime: DateTime<Utc>) -> Self {
        Self {
            code,
            image_count,
            mtime,
        }
    }
}
