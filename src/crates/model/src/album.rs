use chrono::{DateTime, Utc};
use domain::album::AlbumEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub code: String,
    pub name: String,
    pub image_count: usize,
    pub last_modified: DateTime<Utc>,
}

impl From<AlbumEntry> for Album {
    fn from(entry: AlbumEntry) -> Self {
        let code: String = entry.code.into();
        Self {
            name: code.clone(),
            code,
            image_count: entry.image_count,
            last_modified: entry.mtime,
        }
    }
}
