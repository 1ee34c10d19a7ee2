use std::fmt::{self, Display};
use thiserror::Error;

/// 允许的图片扩展名（不区分大小写）
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("Invalid {0}: {1}")]
    InvalidSegment(&'static str, String),
}

/// 校验单个路径片段，拒绝空值、`.`、`..` 以及路径分隔符
fn check_segment(kind: &'static str, value: &str) -> Result<(), ValueError> {
    if value.is_empty() {
        return Err(ValueError::Empty(kind));
    }
    if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(ValueError::InvalidSegment(kind, value.to_string()));
    }
    Ok(())
}

// Helper macro to define validated path-segment newtypes
macro_rules! define_segment {
    ($name:ident, $kind:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: impl Into<String>) -> Result<Self, ValueError> {
                let value = value.into();
                check_segment($kind, &value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueError;
            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_segment!(AlbumCode, "album code");
define_segment!(FileName, "file name");

impl FileName {
    /// 文件名中第一个点之前的部分即为图片 ID（`a.b.png` -> `a`）
    pub fn image_id(&self) -> ImageId {
        ImageId::from_file_name(&self.0)
    }

    /// 扩展名（最后一个点之后，不含点），没有扩展名时返回 None
    pub fn extension(&self) -> Option<&str> {
        self.0
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    pub fn is_image(&self) -> bool {
        is_image_file_name(&self.0)
    }
}

/// 图片 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_file_name(file_name: &str) -> Self {
        let stem = file_name.split('.').next().unwrap_or_default();
        Self(stem.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 生成存储文件名：`<id><ext>`，ext 取自原始文件名最后一个点起的部分
    pub fn file_name_with_extension_of(&self, original_name: &str) -> String {
        match original_name.rfind('.') {
            Some(pos) => format!("{}{}", self.0, &original_name[pos..]),
            None => self.0.clone(),
        }
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<ImageId> for String {
    fn from(id: ImageId) -> Self {
        id.0
    }
}

impl Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_image_file_name(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// 根据文件扩展名推断 Content-Type，未知扩展名按 JPEG 处理
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}
