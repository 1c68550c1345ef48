//! Documentation OpenAPI de l'API d'upload

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API PixUpload
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::optimize_upload,
        crate::api::upload_original,
        crate::api::get_upload_info,
        crate::api::delete_upload,
    ),
    components(
        schemas(
            crate::api::OptimizeForm,
            crate::api::OriginalForm,
            crate::api::UploadResponse,
            crate::api::StoredFileInfo,
            crate::api::DeleteResponse,
            crate::error::ErrorResponse,
            piximage::OutputFormat,
            piximage::Stage,
        )
    ),
    tags(
        (name = "upload", description = "Upload et optimisation d'images")
    ),
    info(
        title = "PixUpload API",
        version = "0.1.0",
        description = r#"
# API d'upload et d'optimisation d'images

## POST /upload/optimize
Reçoit un formulaire multipart et retourne l'image optimisée :

- `file` : l'image (obligatoire)
- `format` : webp, avif, jpeg ou png (défaut: webp)
- `quality` : 1 à 100 (défaut: configuration, 80)
- `width` / `height` : boîte maximale ; l'image n'est jamais agrandie
- `sourceFormat` : `avif` pour forcer le pré-transcodage AVIF

En cas d'échec, la réponse 500 indique l'étape (`decode`, `avif-pretranscode`,
`resize`, `encode`, `write`).

## POST /upload
Stocke l'image sans la modifier.

Les fichiers stockés sont servis sous `/uploads/{name}`.
"#
    )
)]
pub struct ApiDoc;
