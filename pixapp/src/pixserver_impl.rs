//! Implémentation du trait WebAppExt pour le serveur pixserver

use crate::{WebAppExt, normalize_mount_path};
use pixserver::Server;
use rust_embed::RustEmbed;

impl WebAppExt for Server {
    async fn add_webapp<W>(&mut self, path: &str)
    where
        W: RustEmbed + Clone + Send + Sync + 'static,
    {
        let mount_path = normalize_mount_path(path);
        self.add_spa::<W>(&mount_path).await;
    }

    async fn add_webapp_with_redirect<W>(&mut self, path: &str)
    where
        W: RustEmbed + Clone + Send + Sync + 'static,
    {
        let mount_path = normalize_mount_path(path);
        self.add_spa::<W>(&mount_path).await;
        if mount_path != "/" {
            self.add_redirect("/", &mount_path).await;
        }
    }
}
