use crate::data::configuration::Configuration;
use crate::data::dbconnector::DBConnection;
use crate::data::dbconnector::SQLConnector;
pub(crate) mod error;
pub(crate) mod handlers;
pub(crate) mod types;
use axum::{
    Router,
    routing::{delete, get, post},
};
use chrono::FixedOffset;
use log::{debug, error, info};
use std::sync::Arc;

#[derive(Clone)]
pub struct ServerState {
    pub database: Arc<SQLConnector>,
    /// Offset used to read calendar timestamps posted by browsers.
    pub client_offset: FixedOffset,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/venues", get(handlers::list_venues).post(handlers::create_venue))
        .route("/venues/search", post(handlers::search_venues))
        .route(
            "/venues/{id}",
            get(handlers::get_venue)
                .put(handlers::update_venue)
                .delete(handlers::delete_venue),
        )
        .route(
            "/artists",
            get(handlers::list_artists).post(handlers::create_artist),
        )
        .route("/artists/search", post(handlers::search_artists))
        .route(
            "/artists/{id}",
            get(handlers::get_artist)
                .put(handlers::update_artist)
                .delete(handlers::delete_artist),
        )
        .route("/artists/{id}/calendar", get(handlers::get_artist_calendar))
        .route("/calendar", post(handlers::create_calendar))
        .route("/calendar/{id}", delete(handlers::delete_calendar))
        .route("/shows", get(handlers::list_shows).post(handlers::create_show))
        .with_state(state)
}

pub async fn run(config: Configuration, database_connection: SQLConnector) -> anyhow::Result<()> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    debug!("Starting server on {address}");

    let shared_db = Arc::new(database_connection);
    let app = router(ServerState {
        database: shared_db.clone(),
        client_offset: config.calendar.client_offset()?,
    });

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on {address}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, closing database");
    shared_db.close().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
    }
}
