pub mod auth;
pub mod campaigns;
pub mod extract;
pub mod public;
pub mod session;

use crate::state::SharedState;
use axum::{routing::get, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    let api = Router::new()
        .merge(auth::router(state.clone()))
        .merge(campaigns::router(state.clone()))
        .merge(public::router(state));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}

/// Any origin, credentials allowed. The request origin is echoed back since a
/// wildcard cannot be combined with credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
