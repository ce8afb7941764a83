//! HTTP service: `POST /create_slide`, `GET /health` and `/public` files.
//!
//! Startup loads the template, creates the output directory and mounts the
//! file server before any request is handled. Deck generation then runs on
//! tokio's blocking pool, one task per request.
//!
//! # Example
//!
//! ```no_run
//! use deckgen::server::{self, ServerConfig};
//!
//! #[rocket::main]
//! async fn main() -> deckgen::Result<()> {
//!     server::launch(ServerConfig::default().with_public_dir("/srv/decks")).await
//! }
//! ```

mod config;
mod error;
mod routes;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody};
pub use routes::CreatedDeck;

use crate::error::{Error, Result};
use crate::layout::DeckOptions;
use crate::model::DeckRequest;
use crate::storage::{Artifact, ArtifactStore, PUBLIC_ROUTE};
use crate::template::Template;
use rocket::fs::FileServer;
use rocket::{catchers, routes, Build, Rocket};
use std::sync::Arc;

/// Read-only state shared by all requests.
pub(crate) struct AppState {
    template: Template,
    options: DeckOptions,
    store: ArtifactStore,
    base_url: Option<String>,
    fallback_origin: String,
}

impl AppState {
    fn generate(&self, request: DeckRequest) -> Result<Artifact> {
        crate::generate(request, &self.template, &self.options, &self.store)
    }
}

/// Load everything the service needs and assemble the Rocket instance.
///
/// Template and directory problems surface here, not on the first request.
pub fn build(config: &ServerConfig) -> Result<Rocket<Build>> {
    let template = match &config.template {
        Some(path) => Template::open(path)?,
        None => Template::builtin()?,
    };
    let options = config.deck_options();
    options.validate()?;
    let store = ArtifactStore::open(&config.public_dir)?;

    log::info!(
        "event=server_configured template={} layouts={} public_dir={} max_per_slide={}",
        config
            .template
            .as_ref()
            .map_or_else(|| "builtin".to_string(), |p| p.display().to_string()),
        template.layouts().len(),
        store.dir().display(),
        options.max_per_slide
    );

    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port));

    let public_dir = store.dir().to_path_buf();
    let state = AppState {
        template,
        options,
        store,
        base_url: config.base_url.clone(),
        fallback_origin: config.fallback_origin(),
    };

    Ok(rocket::custom(figment)
        .manage(Arc::new(state))
        .mount("/", routes![routes::create_slide, routes::health])
        .mount(PUBLIC_ROUTE, FileServer::from(public_dir))
        .register(
            "/",
            catchers![routes::not_found, routes::unprocessable, routes::internal_error],
        ))
}

/// Build and run the service until shutdown.
pub async fn launch(config: ServerConfig) -> Result<()> {
    build(&config)?
        .launch()
        .await
        .map_err(|e| Error::Internal(format!("server failed: {e}")))?;
    Ok(())
}

/// Run the service on a fresh runtime, blocking until shutdown.
pub fn run(config: ServerConfig) -> Result<()> {
    rocket::execute(launch(config))
}
