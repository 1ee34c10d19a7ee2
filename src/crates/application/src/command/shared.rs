use crate::error::AppError;
use domain::value::ImageId;

/// 图片 ID 生成器，生成的 ID 不依赖文件内容
#[async_trait::async_trait]
pub trait IdGenerator: Send + Sync {
    /// 生成下一个唯一ID
    async fn next_id(&self) -> Result<ImageId, AppError>;
}
