use application::command::upload_image::UploadConfig;
use application::query::config::GalleryConfig;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;

/// 默认上传大小上限：35MB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 35 * 1024 * 1024;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    /// 服务器配置
    server: RawServerConfig,
    /// 图片存储配置
    storage: RawStorageConfig,
    /// 上传配置
    upload: RawUploadConfig,
    /// 图库配置
    gallery: RawGalleryConfig,
    /// 日志配置
    log: RawLogConfig,
}

/// 服务器配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServerConfig {
    /// 监听地址
    host: String,
    /// 监听端口
    port: u16,
    /// 前端静态文件目录
    ui_path: String,
    /// 前端挂载路径
    ui_base_path: String,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ui_path: "./ui".to_string(),
            ui_base_path: "/".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawStorageConfig {
    /// 存储协议：local / memory
    protocol: String,
    /// 相册根目录，每个子目录是一个相册
    images_root: String,
}

impl Default for RawStorageConfig {
    fn default() -> Self {
        Self {
            protocol: "local".to_string(),
            images_root: "./public/Images".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawUploadConfig {
    max_bytes: u64,
    /// 批量上传中相册代码之前最多暂存的文件数
    max_pending_files: usize,
}

impl Default for RawUploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_pending_files: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawGalleryConfig {
    /// 全部图片列表的默认分页大小
    page_size: usize,
}

impl Default for RawGalleryConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLogConfig {
    file: String,
}

impl Default for RawLogConfig {
    fn default() -> Self {
        Self {
            file: "app.log".to_string(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    pub ui_path: String,
    pub ui_base_path: String,
}

/// 存储配置
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub protocol: String,
    pub images_root: String,
}

#[derive(Debug, Clone)]
pub struct AppConfigImpl {
    pub server: Arc<ServerConfig>,
    pub storage: Arc<StorageConfig>,
    pub max_upload_bytes: u64,
    pub max_pending_files: usize,
    pub page_size: usize,
    pub log_file: String,
}

impl Default for AppConfigImpl {
    fn default() -> Self {
        Self::new(RawConfig::default())
    }
}

impl AppConfigImpl {
    fn new(data: RawConfig) -> Self {
        let server_config = ServerConfig {
            host: data.server.host,
            port: data.server.port,
            ui_path: data.server.ui_path,
            ui_base_path: data.server.ui_base_path,
        };
        let storage_config = StorageConfig {
            protocol: data.storage.protocol,
            images_root: data.storage.images_root,
        };
        AppConfigImpl {
            server: Arc::new(server_config),
            storage: Arc::new(storage_config),
            max_upload_bytes: data.upload.max_bytes,
            max_pending_files: data.upload.max_pending_files,
            page_size: data.gallery.page_size,
            log_file: data.log.file,
        }
    }

    /// 指定存储根目录的配置，其余取默认值
    pub fn with_images_root(protocol: &str, images_root: impl Into<String>) -> Self {
        let mut raw = RawConfig::default();
        raw.storage.protocol = protocol.to_string();
        raw.storage.images_root = images_root.into();
        Self::new(raw)
    }

    pub fn server(&self) -> ServerConfig {
        (*self.server).clone()
    }

    pub fn storage(&self) -> StorageConfig {
        (*self.storage).clone()
    }

    pub fn log_file(&self) -> &str {
        &self.log_file
    }

    pub fn load() -> Result<AppConfigImpl, Box<dyn Error>> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let raw: RawConfig = config.try_deserialize()?; // serde 自动填充默认值
        Ok(AppConfigImpl::new(raw))
    }
}

impl UploadConfig for AppConfigImpl {
    fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    fn max_pending_files(&self) -> usize {
        self.max_pending_files
    }
}

impl GalleryConfig for AppConfigImpl {
    fn page_size(&self) -> usize {
        self.page_size
    }
}
