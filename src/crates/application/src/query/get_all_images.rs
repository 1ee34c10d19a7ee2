use crate::query::config::GalleryConfig;
use crate::query::QueryError;
use domain::store::{ImageStore, StoreError};
use log::warn;
use model::image::Image;
use std::sync::Arc;

/// 分页参数，page 从 1 开始
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

#[derive(Clone)]
pub struct GetAllImages {
    store: Arc<dyn ImageStore>,
    config: Arc<dyn GalleryConfig>,
}

impl GetAllImages {
    pub fn new(store: Arc<dyn ImageStore>, config: Arc<dyn GalleryConfig>) -> Self {
        Self { store, config }
    }

    /// 所有相册的图片，按文件修改时间倒序；未指定 page 时返回全部
    pub async fn handle(&self, request: PageRequest) -> Result<Vec<Image>, QueryError> {
        let window = self.page_window(request)?;

        let albums = self
            .store
            .list_albums()
            .await
            .map_err(|e| QueryError::ExecutionError(e.to_string()))?;

        let mut images = Vec::new();
        for album in albums {
            match self.store.list(&album.code).await {
                Ok(entries) => images.extend(entries.iter().map(Image::from_entry)),
                // 列举期间相册被删除
                Err(StoreError::AlbumNotFound(code)) => {
                    warn!("Album {} disappeared while listing images", code);
                }
                Err(e) => return Err(QueryError::ExecutionError(e.to_string())),
            }
        }

        // 稳定排序，时间相同的保持枚举顺序
        images.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(match window {
            Some((skip, take)) => images.into_iter().skip(skip).take(take).collect(),
            None => images,
        })
    }

    fn page_window(&self, request: PageRequest) -> Result<Option<(usize, usize)>, QueryError> {
        let Some(page) = request.page else {
            return Ok(None);
        };
        let size = request.size.unwrap_or_else(|| self.config.page_size());
        if page == 0 {
            return Err(QueryError::InvalidParameter(
                "page must be greater than 0".to_string(),
            ));
        }
        if size == 0 {
            return Err(QueryError::InvalidParameter(
                "size must be greater than 0".to_string(),
            ));
        }
        Ok(Some(((page - 1).saturating_mul(size), size)))
    }
}
