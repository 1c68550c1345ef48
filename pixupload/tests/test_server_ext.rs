use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use piximage::Quality;
use pixserver::Server;
use pixupload::{UploadExt, UploadStore};
use tower::ServiceExt;

#[tokio::test]
async fn test_stored_files_are_served() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path(), "http://localhost:0/uploads").unwrap();

    let mut server = Server::new("Test", "localhost", 0);
    let store = server
        .init_upload_api(store, Quality::default(), 1024 * 1024)
        .await
        .unwrap();

    std::fs::write(store.dir().join("hello.png"), b"fake png bytes").unwrap();

    let response = server
        .router()
        .await
        .oneshot(Request::get("/uploads/hello.png").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"fake png bytes");
}

#[tokio::test]
async fn test_upload_routes_and_docs_are_mounted() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path(), "http://localhost:0/uploads").unwrap();

    let mut server = Server::new("Test", "localhost", 0);
    server
        .init_upload_api(store, Quality::default(), 1024 * 1024)
        .await
        .unwrap();
    let router = server.router().await;

    let response = router
        .clone()
        .oneshot(
            Request::post("/upload/optimize")
                .header(header::CONTENT_TYPE, "multipart/form-data; boundary=X")
                .body(Body::from("--X--\r\n"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(
            Request::get("/api-docs/upload.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(doc["paths"]["/upload/optimize"]["post"].is_object());
}

#[tokio::test]
async fn test_missing_stored_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path(), "http://localhost:0/uploads").unwrap();

    let mut server = Server::new("Test", "localhost", 0);
    server
        .init_upload_api(store, Quality::default(), 1024 * 1024)
        .await
        .unwrap();

    let response = server
        .router()
        .await
        .oneshot(Request::get("/uploads/nope.webp").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
