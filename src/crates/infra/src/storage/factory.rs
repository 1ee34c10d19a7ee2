use application::error::AppError;
use domain::store::ImageStore;
use std::sync::Arc;

use super::local::LocalImageStore;
use super::memory::InMemoryImageStore;
use crate::config::StorageConfig;

#[derive(Debug, Clone, Default)]
pub struct ImageStoreFactoryImpl;

impl ImageStoreFactoryImpl {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, config: &StorageConfig) -> Result<Arc<dyn ImageStore>, AppError> {
        match config.protocol.as_str() {
            "local" | "" => Ok(Arc::new(LocalImageStore::new(&config.images_root))),
            "memory" => Ok(Arc::new(InMemoryImageStore::new())),
            p => Err(AppError::UnknownError(format!(
                "Unsupported storage protocol: {}",
                p
            ))),
        }
    }
}
