use crate::query::QueryError;
use domain::store::ImageStore;
use model::album::Album;
use std::sync::Arc;

#[derive(Clone)]
pub struct ListAlbums {
    store: Arc<dyn ImageStore>,
}

impl ListAlbums {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<Vec<Album>, QueryError> {
        let albums = self
            .store
            .list_albums()
            .await
            .map_err(|e| QueryError::ExecutionError(e.to_string()))?;
        Ok(albums.into_iter().map(Album::from).collect())
    }
}
