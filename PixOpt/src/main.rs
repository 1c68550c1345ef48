use pixapp::{WebAppExt, Webapp};
use pixconfig::get_config;
use pixserver::{ConfigExt, LoggingOptions, ServerBuilder};
use pixupload::UploadExt;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config();

    // ========== PHASE 1 : Infrastructure ==========

    let mut server = ServerBuilder::new_configured().build();
    server
        .init_logging(LoggingOptions::from_config(&config))
        .await;

    info!(config_dir = config.directory(), "📁 Configuration loaded");

    server.add_health_route().await;

    info!("⚙️ Registering configuration API...");
    server.init_config_api().await?;

    // ========== PHASE 2 : Service d'upload ==========

    info!("🖼️ Initializing upload service...");
    let store = server.init_upload_api_configured().await?;
    info!(
        "✅ Uploads stored in {} and served at {}",
        store.dir().display(),
        store.public_base_url()
    );

    info!("📡 Registering Web application...");
    server.add_webapp_with_redirect::<Webapp>("/app").await;

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("✅ PixOpt is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
