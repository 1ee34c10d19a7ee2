pub const URL_PATH_API: &str = "/api";

/// 图片响应缓存一年
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";

pub const MULTIPART_FILE_FIELD: &str = "file";
pub const MULTIPART_ALBUM_CODE_FIELD: &str = "albumCode";

/// 文本字段的最大长度
pub const MAX_TEXT_FIELD_BYTES: usize = 1024;
