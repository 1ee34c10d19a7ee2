use application::command::shared::IdGenerator;
use application::error::AppError;
use async_trait::async_trait;
use domain::value::ImageId;
use uuid::Uuid;

/// 基于 UUID v4 的图片 ID 生成器
#[derive(Debug, Clone, Default)]
pub struct UuidIdGenerator;

impl UuidIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdGenerator for UuidIdGenerator {
    async fn next_id(&self) -> Result<ImageId, AppError> {
        Ok(ImageId::new(Uuid::new_v4().to_string()))
    }
}
