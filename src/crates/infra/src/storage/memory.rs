use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use domain::album::AlbumEntry;
use domain::image::ImageEntry;
use domain::store::{ImageStore, StoreError};
use domain::value::{AlbumCode, FileName, ImageId};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct MemoryFile {
    data: Bytes,
    mtime: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct MemoryAlbum {
    files: BTreeMap<FileName, MemoryFile>,
    mtime: DateTime<Utc>,
}

impl MemoryAlbum {
    fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            mtime: Utc::now(),
        }
    }
}

/// 进程内图片存储，重启后数据丢失，用于演示和测试
#[derive(Clone, Default)]
pub struct InMemoryImageStore {
    albums: Arc<DashMap<AlbumCode, MemoryAlbum>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self {
            albums: Arc::new(DashMap::new()),
        }
    }

    /// 创建空相册
    pub fn create_album(&self, album: AlbumCode) {
        self.albums.entry(album).or_insert_with(MemoryAlbum::new);
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn list_albums(&self) -> Result<Vec<AlbumEntry>, StoreError> {
        let mut albums: Vec<AlbumEntry> = self
            .albums
            .iter()
            .map(|e| {
                let count = e.value().files.keys().filter(|n| n.is_image()).count();
                AlbumEntry::new(e.key().clone(), count, e.value().mtime)
            })
            .collect();
        albums.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(albums)
    }

    async fn list(&self, album: &AlbumCode) -> Result<Vec<ImageEntry>, StoreError> {
        let entry = self
            .albums
            .get(album)
            .ok_or_else(|| StoreError::AlbumNotFound(album.to_string()))?;
        Ok(entry
            .files
            .iter()
            .filter(|(name, _)| name.is_image())
            .map(|(name, file)| {
                ImageEntry::new(album.clone(), name.clone(), file.data.len() as u64, file.mtime)
            })
            .collect())
    }

    async fn exists(&self, album: &AlbumCode) -> Result<bool, StoreError> {
        Ok(self.albums.contains_key(album))
    }

    async fn get(
        &self,
        album: &AlbumCode,
        file_name: &FileName,
    ) -> Result<Option<Bytes>, StoreError> {
        Ok(self
            .albums
            .get(album)
            .and_then(|a| a.files.get(file_name).map(|f| f.data.clone())))
    }

    async fn put(
        &self,
        album: &AlbumCode,
        file_name: &FileName,
        data: Bytes,
    ) -> Result<ImageEntry, StoreError> {
        let mut entry = self
            .albums
            .entry(album.clone())
            .or_insert_with(MemoryAlbum::new);
        if entry.files.contains_key(file_name) {
            return Err(StoreError::AlreadyExists(format!("{}/{}", album, file_name)));
        }
        let now = Utc::now();
        let size = data.len() as u64;
        entry
            .files
            .insert(file_name.clone(), MemoryFile { data, mtime: now });
        entry.mtime = now;
        Ok(ImageEntry::new(album.clone(), file_name.clone(), size, now))
    }

    async fn delete(&self, album: &AlbumCode, id: &ImageId) -> Result<usize, StoreError> {
        let mut entry = self
            .albums
            .get_mut(album)
            .ok_or_else(|| StoreError::AlbumNotFound(album.to_string()))?;
        let before = entry.files.len();
        entry
            .files
            .retain(|name, _| !(name.is_image() && &name.image_id() == id));
        let removed = before - entry.files.len();
        if removed > 0 {
            entry.mtime = Utc::now();
        }
        Ok(removed)
    }
}
