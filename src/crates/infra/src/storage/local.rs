use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use domain::album::AlbumEntry;
use domain::image::ImageEntry;
use domain::store::{ImageStore, StoreError};
use domain::value::{is_image_file_name, AlbumCode, FileName, ImageId};
use log::debug;
use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// 本地文件系统存储：`<root>/<album>/<file>`
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

fn mtime_of(meta: &Metadata) -> DateTime<Utc> {
    DateTime::<Utc>::from(meta.modified().unwrap_or_else(|_| SystemTime::now()))
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn album_dir(&self, album: &AlbumCode) -> PathBuf {
        self.root.join(album.as_str())
    }

    async fn is_dir(path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// 读取目录项元数据（跟随符号链接）。扫描期间被删除的条目返回 None，
    /// 其余错误（包括悬空的符号链接）作为扫描失败返回
    async fn stat_entry(path: &Path) -> Result<Option<Metadata>, StoreError> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(Some(meta)),
            Err(e) if e.kind() == ErrorKind::NotFound => match fs::symlink_metadata(path).await {
                Ok(_) => Err(StoreError::IoError(format!("{}: {}", path.display(), e))),
                Err(gone) if gone.kind() == ErrorKind::NotFound => {
                    debug!("{:?} disappeared while scanning", path);
                    Ok(None)
                }
                Err(other) => Err(other.into()),
            },
            Err(e) => Err(StoreError::IoError(format!("{}: {}", path.display(), e))),
        }
    }

    /// 目录下扩展名在白名单内的普通文件
    async fn image_files(dir: &Path) -> Result<Vec<(FileName, Metadata)>, StoreError> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!("Skipping non UTF-8 file name in {:?}", dir);
                continue;
            };
            if !is_image_file_name(&name) {
                continue;
            }
            // 目录一律跳过
            let meta = match Self::stat_entry(&entry.path()).await? {
                Some(meta) if meta.is_file() => meta,
                _ => continue,
            };
            let Ok(file_name) = FileName::parse(name) else {
                continue;
            };
            files.push((file_name, meta));
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn list_albums(&self) -> Result<Vec<AlbumEntry>, StoreError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Images root {:?} does not exist", self.root);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut albums = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let meta = match Self::stat_entry(&entry.path()).await? {
                Some(meta) if meta.is_dir() => meta,
                _ => continue,
            };
            let Some(code) = entry
                .file_name()
                .to_str()
                .and_then(|name| AlbumCode::parse(name).ok())
            else {
                continue;
            };
            let count = Self::image_files(&entry.path()).await?.len();
            albums.push(AlbumEntry::new(code, count, mtime_of(&meta)));
        }
        albums.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(albums)
    }

    async fn list(&self, album: &AlbumCode) -> Result<Vec<ImageEntry>, StoreError> {
        let dir = self.album_dir(album);
        if !Self::is_dir(&dir).await {
            return Err(StoreError::AlbumNotFound(album.to_string()));
        }
        Ok(Self::image_files(&dir)
            .await?
            .into_iter()
            .map(|(file_name, meta)| {
                ImageEntry::new(album.clone(), file_name, meta.len(), mtime_of(&meta))
            })
            .collect())
    }

    async fn exists(&self, album: &AlbumCode) -> Result<bool, StoreError> {
        Ok(Self::is_dir(&self.album_dir(album)).await)
    }

    async fn get(
        &self,
        album: &AlbumCode,
        file_name: &FileName,
    ) -> Result<Option<Bytes>, StoreError> {
        let path = self.album_dir(album).join(file_name.as_str());
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(
        &self,
        album: &AlbumCode,
        file_name: &FileName,
        data: Bytes,
    ) -> Result<ImageEntry, StoreError> {
        let dir = self.album_dir(album);
        fs::create_dir_all(&dir).await?;
        let path = dir.join(file_name.as_str());

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(format!("{}/{}", album, file_name)));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(&data).await?;
        file.flush().await?;

        let meta = fs::metadata(&path).await?;
        Ok(ImageEntry::new(
            album.clone(),
            file_name.clone(),
            meta.len(),
            mtime_of(&meta),
        ))
    }

    async fn delete(&self, album: &AlbumCode, id: &ImageId) -> Result<usize, StoreError> {
        let dir = self.album_dir(album);
        if !Self::is_dir(&dir).await {
            return Err(StoreError::AlbumNotFound(album.to_string()));
        }
        let mut removed = 0;
        for (file_name, _) in Self::image_files(&dir).await? {
            if &file_name.image_id() != id {
                continue;
            }
            match fs::remove_file(dir.join(file_name.as_str())).await {
                Ok(()) => removed += 1,
                // 并发删除
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }
}
