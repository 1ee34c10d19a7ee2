pub mod consts;
pub mod error;
pub mod gallery_api;
pub mod middleware;
pub mod resources;
pub mod response;
pub mod upload;

use application::command::shared::IdGenerator;
use application::error::AppError;
use domain::store::ImageStore;
use infra::config::AppConfigImpl;
use infra::storage::ImageStoreFactoryImpl;
use infra::UuidIdGenerator;
use log::info;
use std::sync::Arc;

pub struct AppState {
    pub app_cfg: AppConfigImpl,
    pub store: Arc<dyn ImageStore>,
    pub id_generator: Arc<dyn IdGenerator>,
}

impl AppState {
    /// 按配置的存储协议创建图片存储
    pub fn new(app_cfg: AppConfigImpl) -> Result<Self, AppError> {
        let storage_cfg = app_cfg.storage();
        let store = ImageStoreFactoryImpl::new().create(&storage_cfg)?;
        info!(
            "Image store initialized: protocol={}, root={}",
            storage_cfg.protocol, storage_cfg.images_root
        );
        Ok(Self::with_store(app_cfg, store))
    }

    pub fn with_store(app_cfg: AppConfigImpl, store: Arc<dyn ImageStore>) -> Self {
        Self {
            app_cfg,
            store,
            id_generator: Arc::new(UuidIdGenerator::new()),
        }
    }
}
