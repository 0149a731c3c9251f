//! Read-only HTTP API serving the localized news catalog.
//!
//! - `GET /api/news?language=`
//! - `GET /api/news/<id>?language=`
//! - `GET /api/languages`
//! - `GET /health`

mod catalog;
mod routes;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use rocket::figment::Provider;
use rocket::{catchers, routes, Build, Rocket};

use crate::config::ServerConfig;

pub use catalog::{Catalog, CatalogError, LocalizedText, NewsRecord};

/// Assemble the Rocket instance with the catalog as managed state.
pub fn build_rocket<P: Provider>(catalog: Arc<Catalog>, figment: P) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(catalog)
        .mount(
            "/api",
            routes![routes::list_news, routes::get_news, routes::languages],
        )
        .mount("/", routes![routes::health])
        .register("/", catchers![routes::default_catcher])
}

/// Load the catalog named by `config` (or the built-in seed).
pub fn load_catalog(config: &ServerConfig) -> Result<Catalog> {
    match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from '{}'", path.display())),
        None => Catalog::seed().context("Built-in catalog is invalid"),
    }
}

/// Serve the API until shutdown (Ctrl+C / SIGTERM).
pub async fn launch(config: &ServerConfig) -> Result<()> {
    let catalog = Arc::new(load_catalog(config)?);

    let figment = rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port));

    tracing::info!(
        address = %config.address,
        port = config.port,
        records = catalog.len(),
        "Starting news API server"
    );
    build_rocket(catalog, figment)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("News API server has shut down");
    Ok(())
}
