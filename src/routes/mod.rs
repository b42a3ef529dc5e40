use axum::{middleware::from_fn_with_state, Router};
use tower_http::trace::TraceLayer;

use crate::{AppState, controllers::home_controller};

pub mod home_routes;
pub mod message_routes;
pub mod realtime_routes;
pub mod embed_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = message_routes::add_routes(router);
    let router = realtime_routes::add_routes(router);
    let router = embed_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .layer(from_fn_with_state(state.clone(), crate::auth::require_admin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
