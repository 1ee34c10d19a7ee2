use crate::consts::{MAX_TEXT_FIELD_BYTES, MULTIPART_ALBUM_CODE_FIELD, MULTIPART_FILE_FIELD};
use crate::error::ApiError;
use actix_multipart::{Field, Multipart};
use application::command::upload_image::UploadedFile;
use bytes::BytesMut;
use futures::StreamExt;
use log::{debug, warn};

fn bad_payload(e: impl std::fmt::Display) -> ApiError {
    warn!("Invalid multipart payload: {}", e);
    ApiError::BadRequest("Invalid multipart payload".to_string())
}

/// 读取文件字段。超过 `max_bytes` 后丢弃已缓存的数据，只继续计数，
/// 大文件不会完整留在内存中
async fn read_file_field(field: &mut Field, max_bytes: u64) -> Result<UploadedFile, ApiError> {
    let name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or_default()
        .to_string();
    let content_type = field
        .content_type()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();

    let mut size: u64 = 0;
    let mut buf = BytesMut::new();
    let mut truncated = false;
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(bad_payload)?;
        size += chunk.len() as u64;
        if truncated {
            continue;
        }
        if size > max_bytes {
            truncated = true;
            buf = BytesMut::new();
            continue;
        }
        buf.extend_from_slice(&chunk);
    }
    if truncated {
        debug!("Upload {} exceeded {} bytes ({} received)", name, max_bytes, size);
    }

    Ok(UploadedFile {
        name,
        content_type,
        size,
        data: buf.freeze(),
    })
}

async fn read_text_field(field: &mut Field) -> Result<String, ApiError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(bad_payload)?;
        if buf.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
            return Err(ApiError::BadRequest("Form field too large".to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf.to_vec()).map_err(bad_payload)
}

async fn drain_field(field: &mut Field) -> Result<(), ApiError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(bad_payload)?;
    }
    Ok(())
}

/// 表单中的一个字段
#[derive(Debug)]
pub enum FormPart {
    AlbumCode(String),
    File(UploadedFile),
    /// 未缓存内容的文件字段
    SkippedFile,
}

/// 读取下一个 `file` 或 `albumCode` 字段，其他字段忽略。
/// `keep_files` 为 false 时文件内容直接丢弃，不进入内存
pub async fn next_part(
    payload: &mut Multipart,
    max_bytes: u64,
    keep_files: bool,
) -> Result<Option<FormPart>, ApiError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(bad_payload)?;
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            MULTIPART_FILE_FIELD if keep_files => {
                let file = read_file_field(&mut field, max_bytes).await?;
                return Ok(Some(FormPart::File(file)));
            }
            MULTIPART_FILE_FIELD => {
                drain_field(&mut field).await?;
                return Ok(Some(FormPart::SkippedFile));
            }
            MULTIPART_ALBUM_CODE_FIELD => {
                let code = read_text_field(&mut field).await?;
                return Ok(Some(FormPart::AlbumCode(code)));
            }
            other => {
                debug!("Ignoring multipart field {}", other);
                drain_field(&mut field).await?;
            }
        }
    }
    Ok(None)
}
