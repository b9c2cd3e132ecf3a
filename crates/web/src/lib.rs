pub use crate::common::RouteResult;
pub use crate::config::WebConfig;

use axum::{routing::on, Router};
use spots::{database::Database, SpotStore};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::common::{route_not_found, METHOD_FILTER_ALL};

pub mod api;
pub mod common;
pub mod config;

#[derive(Clone)]
pub struct WebState<D: Database> {
    pub store: SpotStore<D>,
}

/// The complete http application: the json api below `/api` and json 404s
/// everywhere else.
pub fn router<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub async fn start_web_server<D: Database>(
    state: WebState<D>,
    config: &WebConfig,
) -> std::io::Result<()> {
    let routes = router(state);

    let listener = TcpListener::bind(config.socket_address()).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
