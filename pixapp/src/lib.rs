//! # pixapp - Interface web de PixOpt
//!
//! Cette crate embarque dans le binaire une page d'upload qui envoie les images à
//! `POST /upload/optimize` et affiche le résultat (format, dimensions, taille, lien).
//!
//! Les fichiers de `webapp/dist` sont inclus à la compilation via `RustEmbed` ;
//! aucun fichier statique n'est à déployer à côté du binaire.
//!
//! ```text
//! pixapp/
//! ├── src/lib.rs
//! └── webapp/dist/
//!     ├── index.html
//!     └── assets/app.js, app.css
//! ```
//!
//! Les chemins des assets dans `index.html` sont absolus (`/app/assets/...`) :
//! la webapp doit être montée sous `/app`.
//!
//! ## Utilisation
//!
//! ```rust,ignore
//! use pixapp::{Webapp, WebAppExt};
//! use pixserver::ServerBuilder;
//!
//! let mut server = ServerBuilder::new_configured().build();
//! server.add_webapp_with_redirect::<Webapp>("/app").await;
//! ```

use rust_embed::RustEmbed;

/// Page d'upload embarquée
#[derive(RustEmbed, Clone)]
#[folder = "webapp/dist"]
pub struct Webapp;

/// Trait d'extension pour servir une webapp embarquée
///
/// `pixserver` ne dépend pas de `pixapp` : l'implémentation pour
/// `pixserver::Server` est fournie ici, derrière la feature `pixserver`.
pub trait WebAppExt {
    /// Monte la SPA `W` sous `path` (ex: "/app")
    async fn add_webapp<W>(&mut self, path: &str)
    where
        W: RustEmbed + Clone + Send + Sync + 'static;

    /// Comme [`add_webapp`](WebAppExt::add_webapp), avec une redirection de `/` vers `path`
    async fn add_webapp_with_redirect<W>(&mut self, path: &str)
    where
        W: RustEmbed + Clone + Send + Sync + 'static;
}

#[cfg(feature = "pixserver")]
mod pixserver_impl;

/// `"app/"` et `" /app "` deviennent `"/app"` ; une chaîne vide donne `"/"`
pub fn normalize_mount_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mount_path() {
        assert_eq!(normalize_mount_path("/app"), "/app");
        assert_eq!(normalize_mount_path(" app/ "), "/app");
        assert_eq!(normalize_mount_path("/"), "/");
        assert_eq!(normalize_mount_path(""), "/");
    }

    #[test]
    fn test_index_is_embedded() {
        let index = Webapp::get("index.html").expect("index.html embedded");
        let html = std::str::from_utf8(&index.data).unwrap();
        assert!(html.contains("/app/assets/app.js"));
        assert!(Webapp::get("assets/app.js").is_some());
    }
}
