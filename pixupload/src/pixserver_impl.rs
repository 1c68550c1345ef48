//! Implémentation du trait UploadExt pour le serveur pixserver
//!
//! `pixupload` étend `pixserver::Server` sans que `pixserver` connaisse `pixupload`,
//! comme `pixapp` le fait avec `WebAppExt`.

use crate::api::{self, UploadState};
use crate::{ApiDoc, UploadConfigExt, UploadExt, UploadStore};
use axum::Router;
use piximage::Quality;
use pixconfig::get_config;
use pixserver::Server;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::info;
use utoipa::OpenApi;

impl UploadExt for Server {
    async fn init_upload_api(
        &mut self,
        store: UploadStore,
        default_quality: Quality,
        max_file_size: usize,
    ) -> anyhow::Result<Arc<UploadStore>> {
        let state = UploadState::new(store, default_quality);
        let store = state.store.clone();

        // Fichiers stockés : GET /uploads/{name}
        let files = Router::new().nest_service("/uploads", ServeDir::new(store.dir()));
        self.add_router("/", files).await;

        // API : /upload, /upload/optimize, /upload/{name}
        let api_router = api::create_router(state, max_file_size);
        self.add_openapi("/upload", api_router, ApiDoc::openapi(), "upload")
            .await;

        info!(
            dir = %store.dir().display(),
            public_url = store.public_base_url(),
            max_file_size,
            quality = default_quality.value(),
            "Upload API initialized"
        );

        Ok(store)
    }

    async fn init_upload_api_configured(&mut self) -> anyhow::Result<Arc<UploadStore>> {
        let config = get_config();
        let store = config.create_upload_store()?;
        let max_file_size = config.get_upload_max_file_size()?;
        let quality = config.get_upload_default_quality();
        self.init_upload_api(store, quality, max_file_size).await
    }
}
