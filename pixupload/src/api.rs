//! Handlers HTTP de l'API d'upload
//!
//! Le router est destiné à être monté sous `/upload` :
//!
//! - `POST /upload/optimize` : optimise l'image reçue et la stocke
//! - `POST /upload` : stocke l'image telle quelle
//! - `GET /upload/{name}` : informations sur un fichier stocké
//! - `DELETE /upload/{name}` : supprime un fichier stocké

use crate::error::{ErrorResponse, UploadError};
use crate::store::UploadStore;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Multipart, Path, State,
        multipart::MultipartRejection,
    },
    routing::{get, post},
};
use piximage::{OptimizeOptions, OutputFormat, PipelineError, Quality, RawOptions, Stage, optimize};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

/// État partagé des handlers d'upload
#[derive(Clone)]
pub struct UploadState {
    pub store: Arc<UploadStore>,
    pub default_quality: Quality,
}

impl UploadState {
    pub fn new(store: UploadStore, default_quality: Quality) -> Self {
        Self {
            store: Arc::new(store),
            default_quality,
        }
    }
}

/// Réponse d'un upload réussi
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Identifiant de l'image stockée
    pub id: String,
    pub format: OutputFormat,
    /// Taille du fichier stocké en octets
    pub size: u64,
    pub width: u32,
    pub height: u32,
    /// URL publique du fichier
    pub url: String,
}

/// Informations sur un fichier stocké
#[derive(Debug, Serialize, ToSchema)]
pub struct StoredFileInfo {
    pub name: String,
    pub size: u64,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub name: String,
    pub message: String,
}

/// Schéma OpenAPI du formulaire de `POST /upload/optimize`
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct OptimizeForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// webp (défaut), avif, jpeg ou png
    format: Option<String>,
    /// 1 à 100
    quality: Option<String>,
    width: Option<String>,
    height: Option<String>,
    /// `avif` pour forcer le pré-transcodage
    source_format: Option<String>,
}

/// Schéma OpenAPI du formulaire de `POST /upload`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct OriginalForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Formulaire multipart décodé
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Bytes>,
    pub file_name: Option<String>,
    pub options: RawOptions,
}

impl UploadForm {
    /// Lit tous les champs du formulaire ; les champs inconnus sont ignorés
    pub async fn read(mut multipart: Multipart) -> Result<Self, UploadError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().map(str::to_string);
                    form.file = Some(field.bytes().await?);
                }
                "format" => form.options.format = Some(field.text().await?),
                "quality" => form.options.quality = Some(field.text().await?),
                "width" => form.options.width = Some(field.text().await?),
                "height" => form.options.height = Some(field.text().await?),
                "sourceFormat" => form.options.source_format = Some(field.text().await?),
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// Contenu du fichier ; absent ou vide donne `NoFile`
    pub fn take_file(&mut self) -> Result<Bytes, UploadError> {
        match self.file.take() {
            Some(data) if !data.is_empty() => Ok(data),
            _ => Err(UploadError::NoFile),
        }
    }
}

/// Optimise l'image envoyée puis la stocke
#[utoipa::path(
    post,
    path = "/upload/optimize",
    request_body(content = OptimizeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image optimisée et stockée", body = UploadResponse),
        (status = 400, description = "Fichier absent ou vide", body = ErrorResponse),
        (status = 413, description = "Fichier trop volumineux", body = ErrorResponse),
        (status = 500, description = "Échec du traitement", body = ErrorResponse)
    ),
    tag = "upload"
)]
pub async fn optimize_upload(
    State(state): State<UploadState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut form = UploadForm::read(multipart?).await?;
    let data = form.take_file()?;
    let options = OptimizeOptions::from_raw(&form.options, state.default_quality);

    info!(
        file = form.file_name.as_deref().unwrap_or("-"),
        input_size = data.len(),
        format = %options.format,
        quality = options.quality.value(),
        width = ?options.width,
        height = ?options.height,
        "Optimizing upload"
    );

    let optimized = tokio::task::spawn_blocking(move || optimize(&data, &options))
        .await
        .map_err(|e| UploadError::Internal(format!("processing task failed: {}", e)))??;

    let id = UploadStore::new_id();
    let name = UploadStore::file_name(&id, optimized.format);
    state
        .store
        .save(&name, &optimized.bytes)
        .await
        .map_err(|e| PipelineError::new(Stage::Write, e))?;

    info!(
        id = %id,
        size = optimized.size(),
        width = optimized.width,
        height = optimized.height,
        "Stored optimized image"
    );

    Ok(Json(UploadResponse {
        url: state.store.public_url(&name),
        id,
        format: optimized.format,
        size: optimized.size() as u64,
        width: optimized.width,
        height: optimized.height,
    }))
}

/// Stocke l'image envoyée sans la modifier
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = OriginalForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stockée", body = UploadResponse),
        (status = 400, description = "Fichier absent ou vide", body = ErrorResponse),
        (status = 415, description = "Format d'image non reconnu", body = ErrorResponse),
        (status = 500, description = "Échec de l'écriture", body = ErrorResponse)
    ),
    tag = "upload"
)]
pub async fn upload_original(
    State(state): State<UploadState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut form = UploadForm::read(multipart?).await?;
    let data = form.take_file()?;

    let probe = data.clone();
    let (format, width, height) = tokio::task::spawn_blocking(move || sniff_image(&probe))
        .await
        .map_err(|e| UploadError::Internal(format!("probe task failed: {}", e)))??;

    let id = UploadStore::new_id();
    let name = UploadStore::file_name(&id, format);
    state
        .store
        .save(&name, &data)
        .await
        .map_err(|e| PipelineError::new(Stage::Write, e))?;

    info!(id = %id, format = %format, size = data.len(), "Stored original image");

    Ok(Json(UploadResponse {
        url: state.store.public_url(&name),
        id,
        format,
        size: data.len() as u64,
        width,
        height,
    }))
}

/// Détecte le format et lit les dimensions sans décoder toute l'image
fn sniff_image(data: &[u8]) -> Result<(OutputFormat, u32, u32), UploadError> {
    let detected = image::guess_format(data)
        .map_err(|_| UploadError::UnsupportedMedia("unrecognized image data".to_string()))?;
    let format = OutputFormat::from_image_format(detected).ok_or_else(|| {
        UploadError::UnsupportedMedia(format!("{:?} is not an accepted format", detected))
    })?;

    let (width, height) = image::ImageReader::with_format(std::io::Cursor::new(data), detected)
        .into_dimensions()
        .map_err(|e| UploadError::UnsupportedMedia(e.to_string()))?;

    Ok((format, width, height))
}

/// Informations sur un fichier stocké
#[utoipa::path(
    get,
    path = "/upload/{name}",
    params(("name" = String, Path, description = "Nom du fichier (ex: {id}.webp)")),
    responses(
        (status = 200, description = "Fichier trouvé", body = StoredFileInfo),
        (status = 400, description = "Nom invalide", body = ErrorResponse),
        (status = 404, description = "Fichier inconnu", body = ErrorResponse)
    ),
    tag = "upload"
)]
pub async fn get_upload_info(
    State(state): State<UploadState>,
    Path(name): Path<String>,
) -> Result<Json<StoredFileInfo>, UploadError> {
    if state.store.path_of(&name).is_none() {
        return Err(UploadError::InvalidName(name));
    }

    let size = state
        .store
        .size_of(&name)
        .await
        .map_err(|e| UploadError::Internal(e.to_string()))?
        .ok_or_else(|| UploadError::NotFound(name.clone()))?;

    Ok(Json(StoredFileInfo {
        url: state.store.public_url(&name),
        name,
        size,
    }))
}

/// Supprime un fichier stocké
#[utoipa::path(
    delete,
    path = "/upload/{name}",
    params(("name" = String, Path, description = "Nom du fichier (ex: {id}.webp)")),
    responses(
        (status = 200, description = "Fichier supprimé", body = DeleteResponse),
        (status = 400, description = "Nom invalide", body = ErrorResponse),
        (status = 404, description = "Fichier inconnu", body = ErrorResponse)
    ),
    tag = "upload"
)]
pub async fn delete_upload(
    State(state): State<UploadState>,
    Path(name): Path<String>,
) -> Result<Json<DeleteResponse>, UploadError> {
    if state.store.path_of(&name).is_none() {
        return Err(UploadError::InvalidName(name));
    }

    let removed = state
        .store
        .remove(&name)
        .await
        .map_err(|e| UploadError::Internal(e.to_string()))?;
    if !removed {
        return Err(UploadError::NotFound(name));
    }

    info!(name = %name, "Deleted upload");
    Ok(Json(DeleteResponse {
        name,
        message: "File deleted successfully".to_string(),
    }))
}

/// Router de l'API, à monter sous `/upload`
///
/// `max_body_size` borne la taille totale de la requête multipart.
pub fn create_router(state: UploadState, max_body_size: usize) -> Router {
    Router::new()
        .route("/", post(upload_original))
        .route("/optimize", post(optimize_upload))
        .route("/{name}", get(get_upload_info).delete(delete_upload))
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}
