use crate::query::QueryError;
use bytes::Bytes;
use domain::store::ImageStore;
use domain::value::{content_type_for, AlbumCode, FileName};
use std::sync::Arc;

/// 图片文件内容
#[derive(Debug, Clone)]
pub struct ImageFileData {
    /// 图片数据（引用计数，clone 零拷贝）
    pub data: Bytes,
    /// MIME 类型
    pub mime_type: String,
}

#[derive(Clone)]
pub struct GetImageFile {
    store: Arc<dyn ImageStore>,
}

impl GetImageFile {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, album_code: &str, file_name: &str) -> Result<ImageFileData, QueryError> {
        let album = AlbumCode::parse(album_code)?;
        let file_name = FileName::parse(file_name)?;
        let data = self
            .store
            .get(&album, &file_name)
            .await
            .map_err(|e| QueryError::ExecutionError(e.to_string()))?
            .ok_or_else(|| QueryError::NotFound(format!("{}/{}", album, file_name)))?;
        Ok(ImageFileData {
            data,
            mime_type: content_type_for(file_name.as_str()).to_string(),
        })
    }
}
