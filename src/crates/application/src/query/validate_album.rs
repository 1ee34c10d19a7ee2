use crate::query::QueryError;
use domain::store::ImageStore;
use domain::value::AlbumCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ValidateAlbum {
    store: Arc<dyn ImageStore>,
}

impl ValidateAlbum {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// 相册目录是否存在
    pub async fn handle(&self, album_code: &str) -> Result<bool, QueryError> {
        let album = AlbumCode::parse(album_code)?;
        self.store
            .exists(&album)
            .await
            .map_err(|e| QueryError::ExecutionError(e.to_string()))
    }
}
