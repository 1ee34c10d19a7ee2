use crate::error::AppError;
use domain::store::{ImageStore, StoreError};
use domain::value::{AlbumCode, ImageId};
use log::info;
use std::sync::Arc;

#[derive(Debug)]
pub struct DeleteImageCmd {
    pub album_code: String,
    pub id: String,
}

#[derive(Clone)]
pub struct DeleteImageService {
    store: Arc<dyn ImageStore>,
}

impl DeleteImageService {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// 删除相册中 ID 匹配的图片文件；相册或文件不存在时返回 NotFound
    pub async fn delete(&self, cmd: DeleteImageCmd) -> Result<(), AppError> {
        let album = AlbumCode::parse(cmd.album_code)?;
        if cmd.id.is_empty() {
            return Err(AppError::InvalidInput("Missing image id".to_string()));
        }
        let id = ImageId::new(cmd.id);

        match self.store.delete(&album, &id).await {
            Ok(0) | Err(StoreError::AlbumNotFound(_)) => Err(AppError::NotFound(format!(
                "Image not found: {}/{}",
                album, id
            ))),
            Ok(removed) => {
                info!("Deleted image {} from {} ({} file(s))", id, album, removed);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
