use axum::{Router, routing::post};
use crate::{AppState, controllers::message_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/message", post(message_controller::post_message))
}
