use crate::command::shared::IdGenerator;
use crate::error::AppError;
use bytes::Bytes;
use chrono::Utc;
use domain::store::{ImageStore, StoreError};
use domain::value::{AlbumCode, FileName};
use log::{info, warn};
use model::image::Image;
use std::sync::Arc;

/// 生成的文件名已存在时的最大重试次数
const MAX_ID_ATTEMPTS: usize = 3;

const MISSING_FILE_OR_ALBUM: &str = "Missing file or album code";

const MIB: u64 = 1024 * 1024;

pub trait UploadConfig: Send + Sync {
    /// 单个文件的大小上限（字节）
    fn max_upload_bytes(&self) -> u64;

    /// 批量上传中，相册代码到达之前最多暂存的文件数
    fn max_pending_files(&self) -> usize;
}

fn size_limit_message(max: u64) -> String {
    if max >= MIB && max % MIB == 0 {
        format!("File size must be less than {}MB", max / MIB)
    } else {
        format!("File size must be less than {} bytes", max)
    }
}

/// 客户端上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 原始文件名
    pub name: String,
    /// 客户端声明的 MIME 类型
    pub content_type: String,
    /// 客户端发送的字节数；超出上限时 data 可能被截断，size 仍为实际发送的大小
    pub size: u64,
    pub data: Bytes,
}

#[derive(Debug)]
pub struct UploadImageCmd {
    pub file: Option<UploadedFile>,
    pub album_code: Option<String>,
}

#[derive(Debug)]
pub struct BatchItemResult {
    pub name: String,
    pub outcome: Result<Image, AppError>,
}

#[derive(Debug, Default)]
pub struct BatchUploadReport {
    pub results: Vec<BatchItemResult>,
}

impl BatchUploadReport {
    pub fn uploaded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.uploaded()
    }
}

/// 逐个接收文件的批量上传。
///
/// 相册代码已知时每个文件立即校验并写入，内存中只保留当前文件；
/// 相册代码之前到达的文件暂存，数量受 `max_pending_files` 限制。
pub struct BatchUpload {
    service: UploadImageService,
    album_code: Option<String>,
    pending: Vec<UploadedFile>,
    received: usize,
    report: BatchUploadReport,
}

impl BatchUpload {
    pub fn album_code(&self) -> Option<&str> {
        self.album_code.as_deref()
    }

    /// 设置目标相册并写入已暂存的文件；空值视为缺失，重复设置以第一次为准
    pub async fn set_album_code(&mut self, album_code: String) -> Result<(), AppError> {
        if album_code.is_empty() || self.album_code.is_some() {
            return Ok(());
        }
        AlbumCode::parse(album_code.as_str())?;
        for file in std::mem::take(&mut self.pending) {
            self.store_one(&album_code, file).await;
        }
        self.album_code = Some(album_code);
        Ok(())
    }

    pub async fn add_file(&mut self, file: UploadedFile) -> Result<(), AppError> {
        self.received += 1;
        match self.album_code.clone() {
            Some(album_code) => self.store_one(&album_code, file).await,
            None => {
                if self.pending.len() >= self.service.config.max_pending_files() {
                    return Err(AppError::InvalidInput(format!(
                        "Too many files before album code (max {})",
                        self.service.config.max_pending_files()
                    )));
                }
                self.pending.push(file);
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<BatchUploadReport, AppError> {
        let Some(album_code) = self.album_code else {
            return Err(AppError::InvalidInput(MISSING_FILE_OR_ALBUM.to_string()));
        };
        if self.received == 0 {
            return Err(AppError::InvalidInput(MISSING_FILE_OR_ALBUM.to_string()));
        }
        info!(
            "Batch upload to {}: {} uploaded, {} failed",
            album_code,
            self.report.uploaded(),
            self.report.failed()
        );
        Ok(self.report)
    }

    async fn store_one(&mut self, album_code: &str, file: UploadedFile) {
        let name = file.name.clone();
        let outcome = self.service.upload_file(album_code, file).await;
        if let Err(e) = &outcome {
            warn!("Batch upload of {} to {} failed: {}", name, album_code, e);
        }
        self.report.results.push(BatchItemResult { name, outcome });
    }
}

#[derive(Clone)]
pub struct UploadImageService {
    store: Arc<dyn ImageStore>,
    id_generator: Arc<dyn IdGenerator>,
    config: Arc<dyn UploadConfig>,
}

impl UploadImageService {
    pub fn new(
        store: Arc<dyn ImageStore>,
        id_generator: Arc<dyn IdGenerator>,
        config: Arc<dyn UploadConfig>,
    ) -> Self {
        Self {
            store,
            id_generator,
            config,
        }
    }

    pub async fn upload(&self, cmd: UploadImageCmd) -> Result<Image, AppError> {
        let album_code = cmd.album_code.filter(|code| !code.is_empty());
        let (file, album_code) = match (cmd.file, album_code) {
            (Some(file), Some(album_code)) => (file, album_code),
            _ => return Err(AppError::InvalidInput(MISSING_FILE_OR_ALBUM.to_string())),
        };
        self.upload_file(&album_code, file).await
    }

    pub fn start_batch(&self) -> BatchUpload {
        BatchUpload {
            service: self.clone(),
            album_code: None,
            pending: Vec::new(),
            received: 0,
            report: BatchUploadReport::default(),
        }
    }

    /// 批量上传：逐个校验、写入，单个失败不影响其他文件
    pub async fn upload_batch(
        &self,
        album_code: Option<String>,
        files: Vec<UploadedFile>,
    ) -> Result<BatchUploadReport, AppError> {
        let album_code = match album_code.filter(|code| !code.is_empty()) {
            Some(code) if !files.is_empty() => code,
            _ => return Err(AppError::InvalidInput(MISSING_FILE_OR_ALBUM.to_string())),
        };

        let mut batch = self.start_batch();
        batch.set_album_code(album_code).await?;
        for file in files {
            batch.add_file(file).await?;
        }
        batch.finish()
    }

    fn validate(&self, file: &UploadedFile) -> Result<(), AppError> {
        let max = self.config.max_upload_bytes();
        if file.size > max {
            return Err(AppError::InvalidInput(size_limit_message(max)));
        }
        if !file.content_type.starts_with("image/") {
            return Err(AppError::InvalidInput("File must be an image".to_string()));
        }
        Ok(())
    }

    async fn upload_file(&self, album_code: &str, file: UploadedFile) -> Result<Image, AppError> {
        self.validate(&file)?;
        let album = AlbumCode::parse(album_code)?;

        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.id_generator.next_id().await?;
            let file_name = FileName::parse(id.file_name_with_extension_of(&file.name))?;
            match self.store.put(&album, &file_name, file.data.clone()).await {
                Ok(entry) => {
                    info!(
                        "Stored {} ({} bytes) as {}/{}",
                        file.name, entry.size, album, file_name
                    );
                    let mut image = Image::with_timestamp(&entry, Utc::now());
                    image.name = file.name;
                    return Ok(image);
                }
                Err(StoreError::AlreadyExists(existing)) => {
                    warn!("Generated file name {} already exists, retrying", existing);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::UnknownError(format!(
            "Could not allocate a unique file name in {} after {} attempts",
            album, MAX_ID_ATTEMPTS
        )))
    }
}
