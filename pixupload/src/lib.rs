//! # pixupload - Service d'upload et d'optimisation d'images pour PixOpt
//!
//! Cette crate expose le pipeline de `piximage` sous forme d'API HTTP :
//! l'image reçue en multipart est optimisée, écrite dans le répertoire d'upload
//! et servie ensuite sous `/uploads/{name}`.
//!
//! ## Exemple avec configuration automatique
//!
//! ```rust,no_run
//! use pixserver::ServerBuilder;
//! use pixupload::UploadExt;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new_configured().build();
//!     server.init_upload_api_configured().await?;
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod openapi;
pub mod store;

#[cfg(feature = "pixconfig")]
pub mod config_ext;

#[cfg(feature = "pixserver")]
mod pixserver_impl;

pub use api::{UploadResponse, UploadState};
pub use error::{ErrorResponse, UploadError};
pub use openapi::ApiDoc;
pub use store::UploadStore;

#[cfg(feature = "pixconfig")]
pub use config_ext::UploadConfigExt;

#[cfg(feature = "pixserver")]
use piximage::Quality;
#[cfg(feature = "pixserver")]
use std::sync::Arc;

/// Trait d'extension pour ajouter l'API d'upload à pixserver
#[cfg(feature = "pixserver")]
pub trait UploadExt {
    /// Enregistre les routes d'upload et le service des fichiers stockés
    ///
    /// # Routes enregistrées
    ///
    /// - `POST /upload/optimize` - Optimiser et stocker une image
    /// - `POST /upload` - Stocker une image telle quelle
    /// - `GET /upload/{name}` - Informations sur un fichier
    /// - `DELETE /upload/{name}` - Supprimer un fichier
    /// - `GET /uploads/{name}` - Fichier stocké
    /// - `GET /swagger-ui/upload` - Documentation interactive
    async fn init_upload_api(
        &mut self,
        store: UploadStore,
        default_quality: Quality,
        max_file_size: usize,
    ) -> anyhow::Result<Arc<UploadStore>>;

    /// Comme [`init_upload_api`](UploadExt::init_upload_api), avec les
    /// paramètres de la section `upload` de la configuration
    async fn init_upload_api_configured(&mut self) -> anyhow::Result<Arc<UploadStore>>;
}
