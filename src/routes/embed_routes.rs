use axum::{Router, routing::get};
use crate::{AppState, controllers::embed_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/embed", get(embed_controller::get_embed))
        .route(
            "/admin/embed",
            get(embed_controller::get_embed_settings).post(embed_controller::post_embed_settings),
        )
}
