use crate::album::AlbumEntry;
use crate::image::ImageEntry;
use crate::value::{AlbumCode, FileName, ImageId};
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Album not found: {0}")]
    AlbumNotFound(String),
    #[error("File already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::IoError(err.to_string())
    }
}

/// 图片存储抽象：每个相册是一个目录，目录下的文件即图片。
///
/// 所有列举操作只返回扩展名在白名单内的文件，元数据在每次调用时重新读取。
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// 列出所有相册；根目录不存在时返回空列表
    async fn list_albums(&self) -> Result<Vec<AlbumEntry>, StoreError>;

    /// 列出单个相册中的图片；相册不存在时返回 `AlbumNotFound`
    async fn list(&self, album: &AlbumCode) -> Result<Vec<ImageEntry>, StoreError>;

    async fn exists(&self, album: &AlbumCode) -> Result<bool, StoreError>;

    /// 读取图片内容，文件不存在时返回 None
    async fn get(&self, album: &AlbumCode, file_name: &FileName)
        -> Result<Option<Bytes>, StoreError>;

    /// 写入新图片，相册不存在时自动创建；目标文件已存在时返回 `AlreadyExists`
    async fn put(
        &self,
        album: &AlbumCode,
        file_name: &FileName,
        data: Bytes,
    ) -> Result<ImageEntry, StoreError>;

    /// 删除相册中所有 ID 匹配的图片，返回删除的文件数
    async fn delete(&self, album: &AlbumCode, id: &ImageId) -> Result<usize, StoreError>;
}
