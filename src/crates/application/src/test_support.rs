use crate::command::shared::IdGenerator;
use crate::command::upload_image::UploadConfig;
use crate::error::AppError;
use crate::query::config::GalleryConfig;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use domain::album::AlbumEntry;
use domain::image::ImageEntry;
use domain::store::{ImageStore, StoreError};
use domain::value::{AlbumCode, FileName, ImageId};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type AlbumFiles = Vec<(FileName, Bytes, DateTime<Utc>)>;

/// 测试用内存存储，记录写入次数
#[derive(Default)]
pub struct FakeStore {
    albums: Mutex<BTreeMap<AlbumCode, AlbumFiles>>,
    pub puts: AtomicUsize,
    pub fail_io: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_io: true,
            ..Self::default()
        }
    }

    pub fn seed(&self, album: &str, file_name: &str, mtime_secs: i64) {
        let mtime = DateTime::from_timestamp(mtime_secs, 0).unwrap();
        self.albums
            .lock()
            .unwrap()
            .entry(AlbumCode::parse(album).unwrap())
            .or_default()
            .push((
                FileName::parse(file_name).unwrap(),
                Bytes::from_static(b"img"),
                mtime,
            ));
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_io {
            return Err(StoreError::IoError("disk unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageStore for FakeStore {
    async fn list_albums(&self) -> Result<Vec<AlbumEntry>, StoreError> {
        self.check()?;
        let albums = self.albums.lock().unwrap();
        Ok(albums
            .iter()
            .map(|(code, files)| {
                let count = files.iter().filter(|(n, _, _)| n.is_image()).count();
                AlbumEntry::new(code.clone(), count, Utc::now())
            })
            .collect())
    }

    async fn list(&self, album: &AlbumCode) -> Result<Vec<ImageEntry>, StoreError> {
        self.check()?;
        let albums = self.albums.lock().unwrap();
        let files = albums
            .get(album)
            .ok_or_else(|| StoreError::AlbumNotFound(album.to_string()))?;
        Ok(files
            .iter()
            .filter(|(n, _, _)| n.is_image())
            .map(|(n, data, mtime)| {
                ImageEntry::new(album.clone(), n.clone(), data.len() as u64, *mtime)
            })
            .collect())
    }

    async fn exists(&self, album: &AlbumCode) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.albums.lock().unwrap().contains_key(album))
    }

    async fn get(
        &self,
        album: &AlbumCode,
        file_name: &FileName,
    ) -> Result<Option<Bytes>, StoreError> {
        self.check()?;
        let albums = self.albums.lock().unwrap();
        Ok(albums.get(album).and_then(|files| {
            files
                .iter()
                .find(|(n, _, _)| n == file_name)
                .map(|(_, data, _)| data.clone())
        }))
    }

    async fn put(
        &self,
        album: &AlbumCode,
        file_name: &FileName,
        data: Bytes,
    ) -> Result<ImageEntry, StoreError> {
        self.check()?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        let mut albums = self.albums.lock().unwrap();
        let files = albums.entry(album.clone()).or_default();
        if files.iter().any(|(n, _, _)| n == file_name) {
            return Err(StoreError::AlreadyExists(file_name.to_string()));
        }
        let now = Utc::now();
        let size = data.len() as u64;
        files.push((file_name.clone(), data, now));
        Ok(ImageEntry::new(album.clone(), file_name.clone(), size, now))
    }

    async fn delete(&self, album: &AlbumCode, id: &ImageId) -> Result<usize, StoreError> {
        self.check()?;
        let mut albums = self.albums.lock().unwrap();
        let files = albums
            .get_mut(album)
            .ok_or_else(|| StoreError::AlbumNotFound(album.to_string()))?;
        let before = files.len();
        files.retain(|(n, _, _)| !(n.is_image() && &n.image_id() == id));
        Ok(before - files.len())
    }
}

/// 按顺序返回预设 ID 的生成器
pub struct SequenceIdGenerator {
    ids: Mutex<VecDeque<String>>,
}

impl SequenceIdGenerator {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            ids: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
        }
    }
}

#[async_trait]
impl IdGenerator for SequenceIdGenerator {
    async fn next_id(&self) -> Result<ImageId, AppError> {
        self.ids
            .lock()
            .unwrap()
            .pop_front()
            .map(ImageId::new)
            .ok_or_else(|| AppError::UnknownError("id sequence exhausted".to_string()))
    }
}

pub struct TestConfig {
    pub max_upload_bytes: u64,
    pub max_pending_files: usize,
    pub page_size: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 35 * 1024 * 1024,
            max_pending_files: 10,
            page_size: 10,
        }
    }
}

impl UploadConfig for TestConfig {
    fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    fn max_pending_files(&self) -> usize {
        self.max_pending_files
    }
}

impl GalleryConfig for TestConfig {
    fn page_size(&self) -> usize {
        self.page_size
    }
}
