//! # pixserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer le serveur HTTP de PixOpt.
//! Les fonctionnalités métier (upload, webapp, configuration) s'y greffent par des
//! traits d'extension définis dans leurs propres crates, sans que `pixserver` les connaisse.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : routes JSON, handlers avec état, sous-routers
//! - ⚛️ **Applications SPA** : service d'applications embarquées avec `RustEmbed`
//! - 🔀 **Redirections** : redirections HTTP permanentes
//! - 📚 **Documentation OpenAPI** : Swagger UI par API
//! - 🌍 **CORS et compression** : appliqués à toutes les réponses
//! - 📡 **Logs** : buffer circulaire, flux SSE et niveau réglable à chaud
//! - ⚡ **Arrêt gracieux** : gestion propre de Ctrl+C
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use pixserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("MyServer", "localhost", 8080).build();
//!
//!     server.add_route("/api/status", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod config_ext;
pub mod logs;
pub mod server;

pub use config_ext::ConfigExt;
pub use logs::{LogState, LoggingOptions, SseLayer, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};
