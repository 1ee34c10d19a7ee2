use super::consts;
use super::AppState;
use crate::error::{
    ApiError, ERROR_ALBUM_UNREADABLE, ERROR_DELETING_IMAGE, ERROR_FETCHING_ALBUMS,
    ERROR_FETCHING_IMAGES, ERROR_SERVING_IMAGE, ERROR_UPLOADING_FILE, ERROR_VALIDATING_ALBUM,
};
use crate::response::{AlbumResponse, ApiResponse, BatchUploadResponse, ImageResponse};
use crate::upload::{next_part, FormPart};
use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpResponse, Responder};
use application::command::delete_image::{DeleteImageCmd, DeleteImageService};
use application::command::upload_image::{UploadImageCmd, UploadImageService};
use application::query::get_album_images::GetAlbumImages;
use application::query::get_all_images::{GetAllImages, PageRequest};
use application::query::get_image_file::GetImageFile;
use application::query::list_albums::ListAlbums;
use application::query::validate_album::ValidateAlbum;
use log::info;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize, Debug)]
struct PageQuery {
    page: Option<usize>,
    size: Option<usize>,
}

fn upload_service(state: &AppState) -> UploadImageService {
    UploadImageService::new(
        state.store.clone(),
        state.id_generator.clone(),
        Arc::new(state.app_cfg.clone()),
    )
}

async fn list_albums(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let albums = ListAlbums::new(state.store.clone())
        .handle()
        .await
        .map_err(|e| ApiError::from_query(e, ERROR_FETCHING_ALBUMS))?;
    let body: Vec<AlbumResponse> = albums.into_iter().map(AlbumResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_album_images(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let album_code = path.into_inner();
    let images = GetAlbumImages::new(state.store.clone())
        .handle(&album_code)
        .await
        .map_err(|e| ApiError::from_query(e, ERROR_ALBUM_UNREADABLE))?;
    let body: Vec<ImageResponse> = images.into_iter().map(ImageResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn validate_album(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let exists = ValidateAlbum::new(state.store.clone())
        .handle(&path.into_inner())
        .await
        .map_err(|e| ApiError::from_query(e, ERROR_VALIDATING_ALBUM))?;
    if exists {
        Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body("Album exists"))
    } else {
        Err(ApiError::NotFound("Album not found".to_string()))
    }
}

async fn get_all_images(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    let request = PageRequest {
        page: query.page,
        size: query.size,
    };
    let images = GetAllImages::new(state.store.clone(), Arc::new(state.app_cfg.clone()))
        .handle(request)
        .await
        .map_err(|e| ApiError::from_query(e, ERROR_FETCHING_IMAGES))?;
    let body: Vec<ImageResponse> = images.into_iter().map(ImageResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_image(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (album_code, file_name) = path.into_inner();
    let file = GetImageFile::new(state.store.clone())
        .handle(&album_code, &file_name)
        .await
        .map_err(|e| ApiError::from_query(e, ERROR_SERVING_IMAGE))?;
    Ok(HttpResponse::Ok()
        .content_type(file.mime_type)
        .insert_header((header::CACHE_CONTROL, consts::IMAGE_CACHE_CONTROL))
        .body(file.data))
}

async fn delete_image(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (album_code, id) = path.into_inner();
    DeleteImageService::new(state.store.clone())
        .delete(DeleteImageCmd { album_code, id })
        .await
        .map_err(|e| ApiError::from_command(e, ERROR_DELETING_IMAGE))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(true)))
}

async fn upload(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let max_bytes = state.app_cfg.max_upload_bytes;
    let mut file = None;
    let mut album_code = None;
    // 只保留第一个文件，之后的文件字段直接丢弃
    while let Some(part) = next_part(&mut payload, max_bytes, file.is_none()).await? {
        match part {
            FormPart::File(f) => file = Some(f),
            FormPart::AlbumCode(code) => album_code = Some(code),
            FormPart::SkippedFile => {}
        }
    }
    let image = upload_service(&state)
        .upload(UploadImageCmd { file, album_code })
        .await
        .map_err(|e| ApiError::from_command(e, ERROR_UPLOADING_FILE))?;
    info!("Uploaded {} to album {}", image.name, image.album_code);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ImageResponse::from(image))))
}

async fn upload_batch(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let max_bytes = state.app_cfg.max_upload_bytes;
    let mut batch = upload_service(&state).start_batch();
    // 每个文件读完即写入，内存中只保留当前文件
    while let Some(part) = next_part(&mut payload, max_bytes, true).await? {
        match part {
            FormPart::File(file) => batch.add_file(file).await,
            FormPart::AlbumCode(code) => batch.set_album_code(code).await,
            FormPart::SkippedFile => Ok(()),
        }
        .map_err(|e| ApiError::from_command(e, ERROR_UPLOADING_FILE))?;
    }
    let report = batch
        .finish()
        .map_err(|e| ApiError::from_command(e, ERROR_UPLOADING_FILE))?;
    let body = BatchUploadResponse::from_report(report, ERROR_UPLOADING_FILE);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

async fn keepalive() -> impl Responder {
    static KEEPALIVE_RESPONSE: &str = r#"{"response":"ok"}"#;
    HttpResponse::Ok()
        .content_type("application/json")
        .body(KEEPALIVE_RESPONSE)
}

pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.service(
        web::scope(consts::URL_PATH_API)
            .route("/keepalive", web::get().to(keepalive))
            .route("/albums", web::get().to(list_albums))
            .route("/albums/{albumCode}", web::get().to(get_album_images))
            .route("/albums/{albumCode}/validate", web::get().to(validate_album))
            .route("/images/all", web::get().to(get_all_images))
            .service(
                web::resource("/images/{albumCode}/{fileName}")
                    .route(web::get().to(get_image))
                    .route(web::delete().to(delete_image)),
            )
            .route("/upload", web::post().to(upload))
            .route("/upload/batch", web::post().to(upload_batch)),
    );
}
