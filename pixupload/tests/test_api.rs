use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use image::{ImageFormat, Rgba, RgbaImage};
use piximage::Quality;
use pixupload::{UploadState, UploadStore, api};
use std::io::Cursor;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "pixopt-test-boundary";
const PUBLIC_URL: &str = "http://localhost:8080/uploads";

enum Part<'a> {
    File(&'a str, &'a [u8]),
    Text(&'a str, &'a str),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File(filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 90, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn setup(max_body_size: usize) -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path(), PUBLIC_URL).unwrap();
    let state = UploadState::new(store, Quality::default());
    let router = Router::new().nest("/upload", api::create_router(state, max_body_size));
    (dir, router)
}

async fn post_form(router: Router, uri: &str, parts: &[Part<'_>]) -> (StatusCode, serde_json::Value) {
    let request = Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(router, request).await
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_optimize_defaults_to_webp() {
    let (dir, router) = setup(1024 * 1024);
    let png = png_fixture(64, 32);

    let (status, json) = post_form(router, "/upload/optimize", &[Part::File("a.png", &png)]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["format"], "webp");
    assert_eq!(json["width"], 64);
    assert_eq!(json["height"], 32);

    let id = json["id"].as_str().unwrap();
    let name = format!("{}.webp", id);
    assert_eq!(json["url"], format!("{}/{}", PUBLIC_URL, name));

    let stored = std::fs::read(dir.path().join(&name)).unwrap();
    assert_eq!(json["size"], stored.len() as u64);
    assert_eq!(&stored[0..4], b"RIFF");
}

#[tokio::test]
async fn test_optimize_resizes_within_box() {
    let (_dir, router) = setup(1024 * 1024);
    let png = png_fixture(400, 200);

    let (status, json) = post_form(
        router,
        "/upload/optimize",
        &[
            Part::Text("format", "jpg"),
            Part::Text("quality", "70"),
            Part::Text("width", "100"),
            Part::File("wide.png", &png),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["format"], "jpeg");
    assert_eq!(json["width"], 100);
    assert_eq!(json["height"], 50);
    assert!(json["url"].as_str().unwrap().ends_with(".jpeg"));
}

#[tokio::test]
async fn test_optimize_never_enlarges() {
    let (_dir, router) = setup(1024 * 1024);
    let png = png_fixture(30, 20);

    let (status, json) = post_form(
        router,
        "/upload/optimize",
        &[
            Part::File("small.png", &png),
            Part::Text("format", "png"),
            Part::Text("width", "300"),
            Part::Text("height", "300"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["width"], 30);
    assert_eq!(json["height"], 20);
}

#[tokio::test]
async fn test_optimize_without_file() {
    let (_dir, router) = setup(1024 * 1024);

    let (status, json) = post_form(router, "/upload/optimize", &[Part::Text("format", "webp")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({ "error": "NO_FILE", "message": "No file uploaded" })
    );
}

#[tokio::test]
async fn test_optimize_empty_file() {
    let (dir, router) = setup(1024 * 1024);

    let (status, json) = post_form(router, "/upload/optimize", &[Part::File("empty.png", b"")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "NO_FILE");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_optimize_reports_decode_stage() {
    let (dir, router) = setup(1024 * 1024);

    let (status, json) = post_form(
        router,
        "/upload/optimize",
        &[Part::File("junk.png", b"definitely not an image")],
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "PROCESSING_FAILED");
    assert_eq!(json["stage"], "decode");
    assert!(!json["message"].as_str().unwrap().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_optimize_reports_avif_pretranscode_stage() {
    let (_dir, router) = setup(1024 * 1024);

    let (status, json) = post_form(
        router,
        "/upload/optimize",
        &[
            Part::Text("sourceFormat", "avif"),
            Part::File("photo.avif", b"not an avif payload"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["stage"], "avif-pretranscode");
}

#[tokio::test]
async fn test_optimize_rejects_oversized_body() {
    let (_dir, router) = setup(1024);
    let payload = vec![7u8; 8 * 1024];

    let (status, json) = post_form(router, "/upload/optimize", &[Part::File("big.png", &payload)]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_optimize_rejects_non_multipart() {
    let (_dir, router) = setup(1024 * 1024);

    let request = Request::post("/upload/optimize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, json) = send(router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "INVALID_MULTIPART");
}

#[tokio::test]
async fn test_upload_original_keeps_bytes() {
    let (dir, router) = setup(1024 * 1024);
    let png = png_fixture(12, 8);

    let (status, json) = post_form(router, "/upload", &[Part::File("raw.png", &png)]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["format"], "png");
    assert_eq!(json["width"], 12);
    assert_eq!(json["height"], 8);

    let name = format!("{}.png", json["id"].as_str().unwrap());
    assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), png);
}

#[tokio::test]
async fn test_upload_original_rejects_unknown_media() {
    let (_dir, router) = setup(1024 * 1024);

    let (status, json) = post_form(router, "/upload", &[Part::File("notes.txt", b"hello")]).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json["error"], "UNSUPPORTED_MEDIA");
}

#[tokio::test]
async fn test_info_and_delete() {
    let (dir, router) = setup(1024 * 1024);
    std::fs::write(dir.path().join("abc.webp"), b"12345").unwrap();

    let (status, json) = send(
        router.clone(),
        Request::get("/upload/abc.webp").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "abc.webp");
    assert_eq!(json["size"], 5);
    assert_eq!(json["url"], format!("{}/abc.webp", PUBLIC_URL));

    let (status, _) = send(
        router.clone(),
        Request::delete("/upload/abc.webp").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!dir.path().join("abc.webp").exists());

    let (status, json) = send(
        router,
        Request::get("/upload/abc.webp").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_info_rejects_hidden_names() {
    let (_dir, router) = setup(1024 * 1024);

    let (status, json) = send(
        router,
        Request::get("/upload/.env").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "INVALID_NAME");
}

#[tokio::test]
async fn test_optimize_reports_write_stage() {
    let (dir, router) = setup(1024 * 1024);
    std::fs::remove_dir_all(dir.path()).unwrap();
    let png = png_fixture(16, 16);

    let (status, json) = post_form(router, "/upload/optimize", &[Part::File("a.png", &png)]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "PROCESSING_FAILED");
    assert_eq!(json["stage"], "write");
    assert!(!json["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_original_reports_write_stage() {
    let (dir, router) = setup(1024 * 1024);
    std::fs::remove_dir_all(dir.path()).unwrap();
    let png = png_fixture(4, 4);

    let (status, json) = post_form(router, "/upload", &[Part::File("raw.png", &png)]).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["stage"], "write");
}
