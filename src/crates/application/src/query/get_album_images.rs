use crate::query::QueryError;
use chrono::Utc;
use domain::store::ImageStore;
use domain::value::AlbumCode;
use model::image::Image;
use std::sync::Arc;

/// 单个相册的图片列表。
///
/// 时间戳取本次读取的时刻而不是文件修改时间；相册目录不存在或不可读时返回
/// `ExecutionError`，不会返回空列表。
#[derive(Clone)]
pub struct GetAlbumImages {
    store: Arc<dyn ImageStore>,
}

impl GetAlbumImages {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, album_code: &str) -> Result<Vec<Image>, QueryError> {
        let album = AlbumCode::parse(album_code)?;
        let entries = self
            .store
            .list(&album)
            .await
            .map_err(|e| QueryError::ExecutionError(e.to_string()))?;
        let now = Utc::now();
        Ok(entries
            .iter()
            .map(|entry| Image::with_timestamp(entry, now))
            .collect())
    }
}
