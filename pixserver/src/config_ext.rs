//! Extension pour intégrer l'API de configuration de pixconfig dans pixserver
//!
//! Ce module fournit le trait `ConfigExt` qui permet d'ajouter facilement
//! l'API REST de configuration au serveur.

use crate::Server;
use anyhow::Result;
use pixconfig::{api, get_config, ApiDoc};
use utoipa::OpenApi;

/// Trait d'extension pour ajouter l'API de configuration à pixserver
pub trait ConfigExt {
    /// Initialise l'API de configuration et enregistre les routes HTTP
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /api/config` - Récupérer toute la configuration
    /// - `GET /api/config/{path}` - Récupérer une valeur spécifique (ex: host.http_port)
    /// - `POST /api/config` - Mettre à jour une valeur
    /// - `GET /swagger-ui/config` - Documentation interactive Swagger
    async fn init_config_api(&mut self) -> Result<()>;
}

impl ConfigExt for Server {
    async fn init_config_api(&mut self) -> Result<()> {
        let api_router = api::create_router(get_config());
        self.add_openapi("/api/config", api_router, ApiDoc::openapi(), "config")
            .await;
        Ok(())
    }
}
