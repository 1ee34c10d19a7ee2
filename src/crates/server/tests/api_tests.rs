use actix_web::{http::header, http::StatusCode, test, web, App};
use domain::store::ImageStore;
use infra::config::AppConfigImpl;
use infra::storage::{InMemoryImageStore, LocalImageStore};
use serde_json::Value;
use server::{gallery_api, AppState};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const BOUNDARY: &str = "gallery-test-boundary";

struct Part<'a> {
    file_name: &'a str,
    content_type: &'a str,
    data: Vec<u8>,
}

fn part<'a>(file_name: &'a str, content_type: &'a str, data: &[u8]) -> Part<'a> {
    Part {
        file_name,
        content_type,
        data: data.to_vec(),
    }
}

fn push_file_field(body: &mut Vec<u8>, file: &Part) {
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file.file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
    body.extend_from_slice(&file.data);
    body.extend_from_slice(b"\r\n");
}

fn push_album_field(body: &mut Vec<u8>, code: &str) {
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"albumCode\"\r\n\r\n");
    body.extend_from_slice(code.as_bytes());
    body.extend_from_slice(b"\r\n");
}

/// 文件字段在前，albumCode 在后
fn multipart_body(album_code: Option<&str>, files: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for file in files {
        push_file_field(&mut body, file);
    }
    if let Some(code) = album_code {
        push_album_field(&mut body, code);
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_request(body: Vec<u8>, uri: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
}

fn upload_request(uri: &str, album_code: Option<&str>, files: &[Part]) -> test::TestRequest {
    multipart_request(multipart_body(album_code, files), uri)
}

fn write_image(path: &Path, mtime: SystemTime) {
    let mut file = File::create(path).unwrap();
    file.write_all(b"\x89PNG fake").unwrap();
    file.set_modified(mtime).unwrap();
}

fn local_state(root: &Path) -> web::Data<AppState> {
    let cfg = AppConfigImpl::with_images_root("local", root.to_string_lossy());
    let store: Arc<dyn ImageStore> = Arc::new(LocalImageStore::new(root));
    web::Data::new(AppState::with_store(cfg, store))
}

macro_rules! gallery_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(gallery_api::configure_service),
        )
        .await
    };
}

#[actix_web::test]
async fn test_upload_then_list_album() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("Images");
    let app = gallery_app!(local_state(&root));

    let req = upload_request(
        "/api/upload",
        Some("holiday"),
        &[part("beach.sunset.JPG", "image/jpeg", b"\xff\xd8\xff\xe0")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["name"], "beach.sunset.JPG");
    assert_eq!(body["data"]["albumCode"], "holiday");
    assert_eq!(
        body["data"]["url"],
        format!("/api/images/holiday/{}.JPG", id)
    );
    assert!(body["data"]["createdAt"].as_str().unwrap().ends_with('Z'));

    let stored = root.join("holiday").join(format!("{}.JPG", id));
    assert_eq!(std::fs::read(stored).unwrap(), b"\xff\xd8\xff\xe0");

    let req = test::TestRequest::get()
        .uri("/api/albums/holiday")
        .to_request();
    let images: Value = test::call_and_read_body_json(&app, req).await;
    let images = images.as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["id"], id.as_str());

    let req = test::TestRequest::get().uri("/api/albums").to_request();
    let albums: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(albums[0]["code"], "holiday");
    assert_eq!(albums[0]["name"], "holiday");
    assert_eq!(albums[0]["imageCount"], 1);
}

#[actix_web::test]
async fn test_missing_root_and_missing_album() {
    let temp_dir = TempDir::new().unwrap();
    let app = gallery_app!(local_state(&temp_dir.path().join("nothing")));

    let req = test::TestRequest::get().uri("/api/albums").to_request();
    let albums: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(albums, serde_json::json!([]));

    let req = test::TestRequest::get().uri("/api/images/all").to_request();
    let images: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(images, serde_json::json!([]));

    let req = test::TestRequest::get().uri("/api/albums/ghost").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(test::read_body(resp).await, "Album not found or unreadable");
}

#[actix_web::test]
async fn test_validate_album() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir(temp_dir.path().join("weddings")).unwrap();
    let app = gallery_app!(local_state(temp_dir.path()));

    let req = test::TestRequest::get()
        .uri("/api/albums/weddings/validate")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "Album exists");

    let req = test::TestRequest::get()
        .uri("/api/albums/ghost/validate")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(test::read_body(resp).await, "Album not found");
}

#[actix_web::test]
async fn test_rejected_uploads_leave_no_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("Images");
    let cfg = AppConfigImpl {
        max_upload_bytes: 1024 * 1024,
        ..AppConfigImpl::with_images_root("local", root.to_string_lossy())
    };
    let state = web::Data::new(AppState::with_store(
        cfg,
        Arc::new(LocalImageStore::new(&root)),
    ));
    let app = gallery_app!(state);

    let big = vec![0u8; 1024 * 1024 + 1];
    let req = upload_request(
        "/api/upload",
        Some("holiday"),
        &[part("big.jpg", "image/jpeg", &big)],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "File size must be less than 1MB");

    let req = upload_request(
        "/api/upload",
        Some("holiday"),
        &[part("notes.txt", "text/plain", b"hello")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "File must be an image");

    let req =
        upload_request("/api/upload", None, &[part("a.jpg", "image/jpeg", b"x")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test::read_body(resp).await, "Missing file or album code");

    let req = upload_request("/api/upload", Some("holiday"), &[]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = upload_request(
        "/api/upload",
        Some("../escape"),
        &[part("a.jpg", "image/jpeg", b"x")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(!root.exists());
    assert!(!temp_dir.path().join("escape").exists());
}

#[actix_web::test]
async fn test_delete_twice_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("trip");
    std::fs::create_dir(&dir).unwrap();
    write_image(&dir.join("abc.png"), SystemTime::now());
    write_image(&dir.join("keep.png"), SystemTime::now());
    let app = gallery_app!(local_state(temp_dir.path()));

    let req = test::TestRequest::delete()
        .uri("/api/images/trip/abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({"success": true, "data": true}));
    assert!(!dir.join("abc.png").exists());
    assert!(dir.join("keep.png").exists());

    let req = test::TestRequest::delete()
        .uri("/api/images/trip/abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(test::read_body(resp).await, "Image not found");

    let req = test::TestRequest::delete()
        .uri("/api/images/ghost/abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_serve_image_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("weddings");
    std::fs::create_dir(&dir).unwrap();
    write_image(&dir.join("f2.png"), SystemTime::now());
    write_image(&dir.join("f3.webp"), SystemTime::now());
    write_image(&dir.join("f4.bmp"), SystemTime::now());
    let app = gallery_app!(local_state(temp_dir.path()));

    let req = test::TestRequest::get()
        .uri("/api/images/weddings/f2.png")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=31536000"
    );
    assert_eq!(test::read_body(resp).await, &b"\x89PNG fake"[..]);

    for (uri, expected) in [
        ("/api/images/weddings/f3.webp", "image/webp"),
        ("/api/images/weddings/f4.bmp", "image/jpeg"),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), expected);
    }

    let req = test::TestRequest::get()
        .uri("/api/images/weddings/missing.png")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(test::read_body(resp).await, "Image not found");
}

#[actix_web::test]
async fn test_all_images_newest_first_with_pagination() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("weddings");
    std::fs::create_dir(&dir).unwrap();
    let day = Duration::from_secs(24 * 3600);
    let now = SystemTime::now();
    write_image(&dir.join("f1.jpg"), now - day * 2);
    write_image(&dir.join("f2.png"), now - day);
    let app = gallery_app!(local_state(temp_dir.path()));

    let req = test::TestRequest::get().uri("/api/images/all").to_request();
    let images: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = images
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["f2", "f1"]);
    assert_eq!(images[0]["url"], "/api/images/weddings/f2.png");

    let req = test::TestRequest::get()
        .uri("/api/images/all?page=2&size=1")
        .to_request();
    let images: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(images.as_array().unwrap().len(), 1);
    assert_eq!(images[0]["id"], "f1");

    let req = test::TestRequest::get()
        .uri("/api/images/all?page=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_batch_upload_reports_each_file() {
    let state = web::Data::new(AppState::with_store(
        AppConfigImpl::with_images_root("memory", ""),
        Arc::new(InMemoryImageStore::new()),
    ));
    let app = gallery_app!(state);

    let req = upload_request(
        "/api/upload/batch",
        Some("party"),
        &[
            part("a.jpg", "image/jpeg", b"a"),
            part("doc.pdf", "application/pdf", b"%PDF"),
            part("b.gif", "image/gif", b"GIF89a"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["uploaded"], 2);
    assert_eq!(body["data"]["failed"], 1);
    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results[1]["name"], "doc.pdf");
    assert_eq!(results[1]["success"], false);
    assert_eq!(results[1]["message"], "File must be an image");
    assert_eq!(results[2]["data"]["albumCode"], "party");

    let req = test::TestRequest::get().uri("/api/albums").to_request();
    let albums: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(albums[0]["imageCount"], 2);

    let req = upload_request("/api/upload/batch", Some("party"), &[]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_batch_with_album_code_first() {
    let store = Arc::new(InMemoryImageStore::new());
    let state = web::Data::new(AppState::with_store(
        AppConfigImpl::with_images_root("memory", ""),
        store.clone(),
    ));
    let app = gallery_app!(state);

    let mut body = Vec::new();
    push_album_field(&mut body, "party");
    push_file_field(&mut body, &part("a.jpg", "image/jpeg", b"a"));
    push_file_field(&mut body, &part("b.webp", "image/webp", b"b"));
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let req = multipart_request(body, "/api/upload/batch").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["uploaded"], 2);
    assert_eq!(body["data"]["failed"], 0);

    let party = domain::value::AlbumCode::parse("party").unwrap();
    assert_eq!(store.list(&party).await.unwrap().len(), 2);
}

#[actix_web::test]
async fn test_batch_limits_files_sent_before_album_code() {
    let store = Arc::new(InMemoryImageStore::new());
    let cfg = AppConfigImpl {
        max_pending_files: 2,
        ..AppConfigImpl::with_images_root("memory", "")
    };
    let state = web::Data::new(AppState::with_store(cfg, store.clone()));
    let app = gallery_app!(state);

    let req = upload_request(
        "/api/upload/batch",
        Some("party"),
        &[
            part("a.jpg", "image/jpeg", b"a"),
            part("b.jpg", "image/jpeg", b"b"),
            part("c.jpg", "image/jpeg", b"c"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(store.list_albums().await.unwrap().is_empty());

    // 未超过暂存上限时正常写入
    let req = upload_request(
        "/api/upload/batch",
        Some("party"),
        &[
            part("a.jpg", "image/jpeg", b"a"),
            part("b.jpg", "image/jpeg", b"b"),
        ],
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["uploaded"], 2);
}

#[cfg(unix)]
#[actix_web::test]
async fn test_unreadable_entry_fails_album_listing() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir(temp_dir.path().join("weddings")).unwrap();
    std::os::unix::fs::symlink(
        temp_dir.path().join("gone"),
        temp_dir.path().join("dangling"),
    )
    .unwrap();
    let app = gallery_app!(local_state(temp_dir.path()));

    let req = test::TestRequest::get().uri("/api/albums").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(test::read_body(resp).await, "Error fetching albums");
}

#[actix_web::test]
async fn test_keepalive() {
    let temp_dir = TempDir::new().unwrap();
    let app = gallery_app!(local_state(temp_dir.path()));
    let req = test::TestRequest::get().uri("/api/keepalive").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, serde_json::json!({"response": "ok"}));
}
